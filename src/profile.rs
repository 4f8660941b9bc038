use crate::error::{Error, Result};
use crate::http::HttpConnectionProfile;

use indexmap::IndexMap;
use ini::{Ini, Properties};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_INI_FILE_PATH: &str = "~/.httpscript";
pub const DEFAULT_INI_SECTION: &str = "default";

const INI_BASE_URL: &str = "base_url";
const INI_TIMEOUT: &str = "timeout";
const INI_INSECURE: &str = "insecure";
const INI_CA_CERT: &str = "ca_cert";
const INI_HEADER_PREFIX: &str = "@";

/// Named connection settings read from an INI file.
///
/// ```ini
/// [default]
/// base_url = http://localhost:8080
/// timeout = 30
/// insecure = false
/// ca_cert = ~/certs/ca.pem
/// @Content-Type = application/json
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    base_url: Option<String>,
    timeout: Option<Duration>,
    insecure: bool,
    ca_cert: Option<String>,
    headers: IndexMap<String, String>,
}

impl Profile {
    pub fn base_url(&self) -> Option<&String> {
        self.base_url.as_ref()
    }

    /// `@Name = value` lines, sent with every request of a session.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// Loads section `name` from `file_path`. Missing file or section is `Ok(None)`.
    pub fn load(file_path: &str, name: &str) -> Result<Option<Profile>> {
        let extended_path = shellexpand::tilde(file_path).to_string();
        if !Path::new(&extended_path).exists() {
            tracing::debug!("profile file not found: {extended_path}");
            return Ok(None);
        }
        let ini = Ini::load_from_file(&extended_path)?;
        let section = match ini.section(Some(name)) {
            Some(s) => s,
            None => {
                tracing::debug!("profile [{name}] not found in {extended_path}");
                return Ok(None);
            }
        };

        let headers = section
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(INI_HEADER_PREFIX)
                    .map(|k| (k.to_string(), value.to_string()))
            })
            .collect::<IndexMap<String, String>>();

        let profile = Profile {
            base_url: section.get(INI_BASE_URL).map(|s| s.to_string()),
            timeout: try_get::<u64>(section, INI_TIMEOUT)?.map(Duration::from_secs),
            insecure: try_get::<bool>(section, INI_INSECURE)?.unwrap_or(false),
            ca_cert: section.get(INI_CA_CERT).map(|s| s.to_string()),
            headers,
        };

        Ok(Some(profile))
    }
}

fn try_get<T>(section: &Properties, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    section
        .get(key)
        .map(|s| {
            s.trim()
                .parse::<T>()
                .map_err(|e| Error::Config(format!("invalid value for '{key}': {s} ({e})")))
        })
        .transpose()
}

impl HttpConnectionProfile for Profile {
    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn insecure(&self) -> bool {
        self.insecure
    }

    fn ca_cert(&self) -> Option<&String> {
        self.ca_cert.as_ref()
    }
}
