use indexmap::IndexMap;

pub const QUERY_DELIMITER: &str = "==";
pub const HEADER_DELIMITER: &str = ":";

/// Headers and query parameters pulled out of loose `key==value` / `key:value` tokens.
///
/// Both maps keep the order in which a key was first seen; a repeated key
/// overwrites the value but keeps its slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    headers: IndexMap<String, String>,
    query: IndexMap<String, String>,
}

impl Params {
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    pub fn query(&self) -> &IndexMap<String, String> {
        &self.query
    }

    pub fn insert_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key.into(), value.into());
    }

    pub fn insert_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.insert(key.into(), value.into());
    }

    /// Puts `defaults` in front of the explicit headers; an explicit header
    /// of the same name is applied later and wins.
    pub fn with_default_headers(mut self, defaults: &IndexMap<String, String>) -> Self {
        let explicit = std::mem::take(&mut self.headers);
        self.headers = defaults.clone();
        for (key, value) in explicit {
            self.headers.insert(key, value);
        }
        self
    }
}

/// Sorts tokens into headers and query parameters.
///
/// `==` is checked before `:`, so `a==b:c` is a query parameter. Tokens with
/// neither delimiter are dropped.
pub fn classify<I, S>(tokens: I) -> Params
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut params = Params::default();

    for token in tokens {
        let token = token.as_ref();
        if let Some((key, value)) = token.split_once(QUERY_DELIMITER) {
            params.insert_query(key, value);
        } else if let Some((key, value)) = token.split_once(HEADER_DELIMITER) {
            params.insert_header(key, value);
        } else {
            tracing::debug!("ignoring parameter without delimiter: {token:?}");
        }
    }

    params
}
