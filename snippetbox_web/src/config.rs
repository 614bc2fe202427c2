use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use snippetbox::SessionConfig;
use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_DATABASE_URL: &str = "sqlite://snippetbox.db";

#[derive(Debug, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("Invalid ADDR {0:?}: {1}")]
    InvalidAddr(String, String),
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// Where users and snippets live.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Database {
    /// In-memory collaborators; everything is lost on exit.
    Memory,
    Sqlite(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct TlsPaths {
    pub(crate) cert: PathBuf,
    pub(crate) key: PathBuf,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ServerConfig {
    pub(crate) addr: SocketAddr,
    pub(crate) database: Database,
    /// Serve HTTPS when set, plain HTTP otherwise.
    pub(crate) tls: Option<TlsPaths>,
}

impl ServerConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok().filter(|v| !v.is_empty()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_str = lookup("ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_str
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddr(addr_str, e.to_string()))?;

        let database = match lookup("DATABASE_URL") {
            Some(url) if url == "memory" => Database::Memory,
            Some(url) => Database::Sqlite(url),
            None => Database::Sqlite(DEFAULT_DATABASE_URL.to_string()),
        };

        let tls = match (lookup("TLS_CERT_PATH"), lookup("TLS_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            addr,
            database,
            tls,
        })
    }

    /// Secure-only cookies served over plain HTTP never come back from browsers,
    /// so every form post would fail the CSRF check.
    pub(crate) fn drops_secure_cookies(&self, session: &SessionConfig) -> bool {
        session.secure && self.tls.is_none()
    }
}
