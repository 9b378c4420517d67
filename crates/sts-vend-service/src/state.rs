//! Application state.

use std::sync::Arc;
use std::time::Duration;

use sts_vend_store::RocksStore;

use crate::config::ServiceConfig;
use crate::sts::StsClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// STS gateway client.
    pub sts: Arc<StsClient>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The STS client is built from the already-validated configuration; the
    /// credential pool is guaranteed non-empty at this point.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        tracing::info!(
            sts_url = %config.sts_api_base_url,
            accounts = config.sts_user_ids.len(),
            "STS gateway configured"
        );

        let sts = Arc::new(StsClient::new(
            config.sts_api_base_url.clone(),
            config.sts_user_ids.clone(),
            config.sts_user_password.clone(),
            Duration::from_secs(config.sts_timeout_seconds),
        ));

        Self { store, config, sts }
    }
}
