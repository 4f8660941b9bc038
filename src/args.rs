use httpscript::ColorChoice;
use httpscript::profile::{DEFAULT_INI_FILE_PATH, DEFAULT_INI_SECTION};

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct CommandLineArgs {
    #[clap(help = "HTTP method (GET/POST/PUT/PATCH/DELETE etc.)")]
    method: String,
    #[clap(help = "URL or path appended to the base URL")]
    url: String,
    #[clap(help = "`key==value` query parameters and `key:value` headers")]
    params: Vec<String>,
    #[clap(short = 'd', long, help = "body text to send with the request")]
    data: Option<String>,
    #[clap(short = 'c', long, default_value = DEFAULT_INI_FILE_PATH, help = "profile file")]
    config: String,
    #[clap(short = 'p', long, default_value = DEFAULT_INI_SECTION, help = "profile name")]
    profile: String,
    #[clap(short = 'b', long, help = "base URL prepended to the URL argument")]
    base_url: Option<String>,
    #[clap(short = 't', long, help = "request timeout in seconds")]
    timeout: Option<u64>,
    #[clap(
        short = 'k',
        long,
        help = "Allow insecure server connections when using SSL"
    )]
    insecure: bool,
    #[clap(short = 'r', long, help = "CA certificate PEM file path")]
    ca_cert: Option<String>,
    #[clap(
        short = 'x',
        long = "extract",
        help = "print the value at this JSON path of the response body"
    )]
    extract: Vec<String>,
    #[clap(long, default_value = "auto", help = "colorize output: auto, always or never")]
    color: ColorChoice,
    #[clap(
        short = 'v',
        long,
        help = "Print verbose message",
        default_value = "false"
    )]
    verbose: bool,
}

impl CommandLineArgs {
    pub fn get() -> Self {
        CommandLineArgs::parse()
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> Vec<&str> {
        self.params.iter().map(String::as_str).collect()
    }

    pub fn data(&self) -> &str {
        self.data.as_deref().unwrap_or("")
    }

    pub fn config(&self) -> &str {
        &self.config
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn base_url(&self) -> Option<&String> {
        self.base_url.as_ref()
    }

    pub fn timeout(&self) -> Option<u64> {
        self.timeout
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }

    pub fn extract(&self) -> &[String] {
        &self.extract
    }

    pub fn color(&self) -> ColorChoice {
        self.color
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}
