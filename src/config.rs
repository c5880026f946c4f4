//! Mail configuration loaded from a TOML file.
//!
//! ```toml
//! [login]
//! user = "sender@example.com"
//! password = "secret"
//!
//! [server]
//! smtp_server = "smtp.example.com"
//! port = 465
//! ```
use serde::Deserialize;
use std::fmt::Debug;
use std::path::Path;
use thiserror::Error;

/// Default location of the mail configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Read config file '{path}' failed: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Parse config file '{path}' failed: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Sender credentials and SMTP server address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailConfig {
    pub login: LoginConfig,
    pub server: ServerConfig,
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginConfig {
    /// Sender address, also used as SMTP user name
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub smtp_server: String,
    /// Implicit TLS port, usually 465
    pub port: u16,
}

impl MailConfig {
    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

impl Debug for LoginConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
