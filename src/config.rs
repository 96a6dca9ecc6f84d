use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub enforce_capacity: bool,
    pub seed_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            static_dir: PathBuf::from("static"),
            enforce_capacity: false,
            seed_file: None,
        }
    }
}

impl AppConfig {
    /// Reads HOST, PORT, STATIC_DIR, ENFORCE_CAPACITY and ACTIVITIES_SEED_FILE.
    /// HOST must be an IP literal.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: v,
            })?,
            None => defaults.port,
        };
        let enforce_capacity = match get("ENFORCE_CAPACITY") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                key: "ENFORCE_CAPACITY",
                value: v,
            })?,
            None => defaults.enforce_capacity,
        };

        Ok(Self {
            host: get("HOST").unwrap_or(defaults.host),
            port,
            static_dir: get("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            enforce_capacity,
            seed_file: get("ACTIVITIES_SEED_FILE").map(PathBuf::from),
        })
    }

    /// The port tried when binding `port` fails.
    pub fn fallback_port(&self) -> Result<u16, ConfigError> {
        self.port.checked_add(1).ok_or(ConfigError::Invalid {
            key: "PORT",
            value: format!("{} has no fallback port", self.port),
        })
    }

    pub fn socket_addr(&self, port: u16) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST",
                value: self.host.clone(),
            })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
