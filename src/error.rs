use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while composing, sending or reading an exchange.
///
/// A non-2xx status is not an error; check it with [`crate::succeed`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to encode JSON body: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid URL '{url}': {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{name}': {reason}")]
    Header { name: String, reason: String },

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ini::Error> for Error {
    fn from(e: ini::Error) -> Self {
        Error::Config(e.to_string())
    }
}
