pub mod base;
pub mod http_client;
pub mod mock_handlers;

// Re-export from base.rs so we can do "use crate::client::*;"
pub use base::{create_auth_client, request_access_token, AuthClient};
pub use http_client::HttpAuthClient;
pub use mock_handlers::{MockHandlers, MOCK_ACCESS_TOKEN};
