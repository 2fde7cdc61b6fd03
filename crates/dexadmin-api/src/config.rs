use dexadmin_core::{CoreError, MemoryCore};
use dexadmin_types::{Account, AccountId, TypesError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::auth::AuthSecret;
use crate::tls::TlsConfig;

/// Environment variable holding the admin password. Takes precedence over
/// `auth_sha256` in the config file.
pub const PASSWORD_ENV: &str = "DEXADMIN_PASSWORD";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("auth_sha256 must be a hex-encoded SHA-256 digest: {0}")]
    InvalidAuthDigest(String),

    #[error("no admin credential configured: set {} or auth_sha256", PASSWORD_ENV)]
    MissingCredential,

    #[error("tls_cert and tls_key must be set together")]
    IncompleteTls,

    #[error("invalid account id {id:?}: {source}")]
    InvalidAccount {
        id: String,
        #[source]
        source: TypesError,
    },

    #[error("invalid market configuration: {0}")]
    Market(#[from] CoreError),
}

/// Configuration for the admin server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Address the admin API listens on
    pub listen_addr: SocketAddr,

    /// Hex-encoded SHA-256 digest of the admin password
    pub auth_sha256: Option<String>,

    /// PEM certificate chain for HTTPS. Plain HTTP when unset.
    pub tls_cert: Option<PathBuf>,

    /// PEM private key matching `tls_cert`
    pub tls_key: Option<PathBuf>,

    /// Log filter directive used when `RUST_LOG` is not set
    pub log_filter: String,

    /// Markets registered with the in-memory exchange core
    pub markets: Vec<MarketConfig>,

    /// Hex account ids registered with the in-memory exchange core
    pub accounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    pub name: String,
    pub epoch_duration_ms: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 6542)),
            auth_sha256: None,
            tls_cert: None,
            tls_key: None,
            log_filter: "info".to_string(),
            markets: Vec::new(),
            accounts: Vec::new(),
        }
    }
}

impl AdminConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Resolve the admin credential. A plain password (normally read from
    /// [`PASSWORD_ENV`]) wins over the configured digest.
    pub fn auth_secret(&self, password: Option<&str>) -> Result<AuthSecret, ConfigError> {
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            return Ok(AuthSecret::from_password(password));
        }
        match &self.auth_sha256 {
            Some(digest) => AuthSecret::from_hex_digest(digest)
                .map_err(|e| ConfigError::InvalidAuthDigest(e.to_string())),
            None => Err(ConfigError::MissingCredential),
        }
    }

    /// TLS settings, if HTTPS is configured.
    pub fn tls(&self) -> Result<Option<TlsConfig>, ConfigError> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Ok(Some(TlsConfig::new(cert, key))),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteTls),
        }
    }

    /// Build the in-memory exchange core seeded with the configured markets
    /// and accounts.
    pub fn build_core(&self) -> Result<MemoryCore, ConfigError> {
        let mut core = MemoryCore::new();
        core.set_config(serde_json::json!({
            "markets": self.markets.iter().map(|m| serde_json::json!({
                "name": m.name.to_lowercase(),
                "epochlen": m.epoch_duration_ms,
            })).collect::<Vec<_>>(),
        }));

        for market in &self.markets {
            core.add_market(&market.name, market.epoch_duration_ms)?;
        }
        for id in &self.accounts {
            let account_id = AccountId::from_hex(id).map_err(|source| ConfigError::InvalidAccount {
                id: id.clone(),
                source,
            })?;
            core.add_account(Account::new(account_id));
        }
        Ok(core)
    }
}
