use std::collections::HashMap;

use serde_json::{json, Value};

use crate::config::ApiConfig;

/// Token handed out by the built-in fixtures. Its claims carry
/// `sub = "mock-user"` and an expiry in 2100 so expiry decoding works on it.
pub const MOCK_ACCESS_TOKEN: &str = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJzdWIiOiJtb2NrLXVzZXIiLCJleHAiOjQxMDI0NDQ4MDB9.mock";

/// Canned JSON responses keyed by request path.
///
/// Once registered into an [`AuthClient`](super::AuthClient), matching
/// requests are answered from this table and never reach the network.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockHandlers {
    routes: HashMap<String, Value>,
}

impl MockHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, path: impl Into<String>, body: Value) -> Self {
        self.routes.insert(path.into(), body);
        self
    }

    /// The handlers installed when `bootstrap.use_mock_data` is enabled.
    pub fn fixtures(api: &ApiConfig) -> Self {
        Self::new()
            .with_route(
                api.refresh_path.as_str(),
                json!({ "data": { "accessToken": MOCK_ACCESS_TOKEN } }),
            )
            .with_route(api.logout_path.as_str(), json!({}))
    }

    pub fn response_for(&self, path: &str) -> Option<Value> {
        self.routes.get(path).cloned()
    }

    pub(crate) fn len(&self) -> usize {
        self.routes.len()
    }
}
