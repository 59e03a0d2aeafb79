use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::base::AuthClient;
use super::mock_handlers::MockHandlers;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::models::RefreshRequest;

/// reqwest-backed client. The cookie store is enabled so the refresh cookie
/// set by the server is sent back on every call.
pub struct HttpAuthClient {
    client: reqwest::Client,
    config: ApiConfig,
    mocks: RwLock<Option<MockHandlers>>,
}

impl HttpAuthClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()
            .map_err(|e| AuthError::transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            mocks: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn mocked(&self, path: &str) -> Option<Value> {
        self.mocks
            .read()
            .expect("mock handler lock poisoned")
            .as_ref()
            .and_then(|handlers| handlers.response_for(path))
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn refresh(&self, access_token: Option<&str>) -> Result<Value, AuthError> {
        if let Some(body) = self.mocked(&self.config.refresh_path) {
            debug!("Answering refresh from mock handlers");
            return Ok(body);
        }

        let url = self.url(&self.config.refresh_path);
        debug!("Requesting token refresh at {}", url);

        let resp = self
            .client
            .post(&url)
            .json(&RefreshRequest {
                access_token: access_token.map(str::to_string),
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            debug!("Token refresh rejected with {}", status);
            return Err(AuthError::Status {
                status: status.as_u16(),
            });
        }

        resp.json::<Value>()
            .await
            .map_err(|e| AuthError::invalid_body(format!("Failed to parse refresh JSON: {}", e)))
    }

    async fn logout(&self) -> Result<(), AuthError> {
        if self.mocked(&self.config.logout_path).is_some() {
            debug!("Answering logout from mock handlers");
            return Ok(());
        }

        let url = self.url(&self.config.logout_path);
        debug!("Requesting logout at {}", url);

        let resp = self.client.post(&url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(AuthError::Status {
                status: status.as_u16(),
            })
        }
    }

    fn register_mock_handlers(&self, handlers: MockHandlers) {
        info!("Registering {} mock response handlers", handlers.len());
        *self.mocks.write().expect("mock handler lock poisoned") = Some(handlers);
    }
}
