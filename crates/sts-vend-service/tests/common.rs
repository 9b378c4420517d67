//! Common test utilities for sts-vend integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sts_vend_service::{create_router, AppState, ServiceConfig};
use sts_vend_store::RocksStore;

/// The credential pool every harness is configured with.
pub const TEST_USER_IDS: [&str; 3] = ["1001", "1002", "1003"];

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Mock STS provider.
    pub sts: MockServer,
    /// Direct store handle for asserting persisted state.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database and a mock STS
    /// server. No STS responses are mounted yet.
    pub async fn new() -> Self {
        let sts = MockServer::start().await;
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            sts_api_base_url: sts.uri(),
            sts_user_ids: TEST_USER_IDS.iter().map(ToString::to_string).collect(),
            sts_user_password: "secret".into(),
            sts_timeout_seconds: 5,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            sts,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Mount an STS mock that issues `token` for every vending call.
    pub async fn mock_sts_success(&self, token: &str) {
        Mock::given(method("GET"))
            .and(path("/api/Power/GetVendingToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Code": 0,
                "Message": "OK",
                "Data": { "Token": token }
            })))
            .mount(&self.sts)
            .await;
    }

    /// Mount an STS mock that rejects every vending call with `message`.
    pub async fn mock_sts_failure(&self, message: &str) {
        Mock::given(method("GET"))
            .and(path("/api/Power/GetVendingToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Code": 5,
                "Message": message
            })))
            .mount(&self.sts)
            .await;
    }
}

/// A well-formed vend request body.
pub fn vend_body(client_id: &str, amount: f64, units: f64) -> Value {
    json!({
        "clientId": client_id,
        "submeterNumber": "58000123456",
        "vendData": {
            "amount": amount,
            "units": units,
            "transactionId": "rcpt-001",
            "tanescoNumber": "04123456789"
        },
        "vendType": "upload"
    })
}
