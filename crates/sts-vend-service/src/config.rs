//! Service configuration.
//!
//! All configuration is read once at startup into an explicit struct and
//! passed by reference from there on. A missing required variable is a
//! deployment error and aborts the process before the listener binds.

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on, e.g. `"0.0.0.0:5000"`.
    pub listen_addr: String,

    /// Path to the `RocksDB` data directory.
    pub data_dir: String,

    /// Base URL of the STS vending API.
    pub sts_api_base_url: String,

    /// Ordered, non-empty pool of STS account ids. Rotation follows this
    /// order, so the first entry absorbs load first.
    pub sts_user_ids: Vec<String>,

    /// Password shared by all STS accounts.
    pub sts_user_password: String,

    /// Timeout for a single STS call, in seconds (default: 10).
    pub sts_timeout_seconds: u64,

    /// CORS allowed origins (default: `*`).
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes (default: 1MB).
    pub max_body_bytes: usize,

    /// Inbound request timeout in seconds (default: 30).
    pub request_timeout_seconds: u64,
}

/// Startup-fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    /// The STS credential pool is empty after parsing.
    #[error("STS_USER_IDS must contain at least one account id")]
    EmptyCredentialPool,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when any required variable is missing or
    /// the credential pool parses to empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let sts_user_ids = parse_user_ids(&required("STS_USER_IDS")?);
        if sts_user_ids.is_empty() {
            return Err(ConfigError::EmptyCredentialPool);
        }

        Ok(Self {
            listen_addr: required("LISTEN_ADDR")?,
            data_dir: required("DATA_DIR")?,
            sts_api_base_url: required("STS_API_BASE_URL")?,
            sts_user_ids,
            sts_user_password: required("STS_USER_PASSWORD")?,
            sts_timeout_seconds: lookup("STS_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: lookup("MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: lookup("REQUEST_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }
}

/// Parse the comma-separated STS account id list, dropping blank entries.
fn parse_user_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}
