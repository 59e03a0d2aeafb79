use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info};

use super::http_client::HttpAuthClient;
use super::mock_handlers::MockHandlers;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::models::token::extract_access_token;

/// Transport for the authentication endpoints.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// POST the refresh route with `{"accessToken": <access_token>}` and the
    /// refresh cookie attached. Returns the raw JSON body.
    async fn refresh(&self, access_token: Option<&str>) -> Result<Value, AuthError>;

    /// POST the logout route with no body.
    async fn logout(&self) -> Result<(), AuthError>;

    /// Answer matching routes from `handlers` from now on.
    fn register_mock_handlers(&self, handlers: MockHandlers);
}

/// Run a refresh with a null access token and pull the new token out of the response.
pub async fn request_access_token(client: &dyn AuthClient) -> Result<String, AuthError> {
    let body = client.refresh(None).await?;
    match extract_access_token(&body) {
        Some(token) => {
            debug!("Refresh response carried an access token");
            Ok(token)
        }
        None => {
            debug!("Refresh response had no access token in either accepted shape");
            Err(AuthError::MissingToken)
        }
    }
}

/// Creates the HTTP client for the configured endpoints.
pub fn create_auth_client(config: &ApiConfig) -> Result<Arc<dyn AuthClient>, AuthError> {
    match HttpAuthClient::new(config) {
        Ok(client) => {
            info!("Auth client ready for {}", config.base_url);
            Ok(Arc::new(client))
        }
        Err(e) => {
            error!("Failed to create auth client: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct CannedClient {
        body: Mutex<Option<Result<Value, AuthError>>>,
    }

    #[async_trait]
    impl AuthClient for CannedClient {
        async fn refresh(&self, access_token: Option<&str>) -> Result<Value, AuthError> {
            assert!(access_token.is_none());
            self.body.lock().unwrap().take().expect("refresh called twice")
        }

        async fn logout(&self) -> Result<(), AuthError> {
            Ok(())
        }

        fn register_mock_handlers(&self, _handlers: MockHandlers) {}
    }

    fn canned(body: Result<Value, AuthError>) -> CannedClient {
        CannedClient {
            body: Mutex::new(Some(body)),
        }
    }

    #[tokio::test]
    async fn test_request_access_token_accepts_both_shapes() {
        let nested = canned(Ok(json!({"data": {"accessToken": "X"}})));
        assert_eq!(request_access_token(&nested).await, Ok("X".to_string()));

        let flat = canned(Ok(json!({"accessToken": "Y"})));
        assert_eq!(request_access_token(&flat).await, Ok("Y".to_string()));
    }

    #[tokio::test]
    async fn test_request_access_token_missing_token() {
        let client = canned(Ok(json!({"data": null})));
        assert_eq!(
            request_access_token(&client).await,
            Err(AuthError::MissingToken)
        );
    }

    #[tokio::test]
    async fn test_request_access_token_passes_errors_through() {
        let client = canned(Err(AuthError::Status { status: 401 }));
        assert_eq!(
            request_access_token(&client).await,
            Err(AuthError::Status { status: 401 })
        );
    }
}
