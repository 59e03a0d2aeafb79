use std::sync::Arc;

use tracing::{debug, info};

use crate::client::AuthClient;
use crate::store::{SessionStorage, TokenStore, RETURN_PATH_KEY};

/// Login/logout operations the UI drives against the shared session state.
pub struct AuthSession {
    token_store: Arc<TokenStore>,
    client: Arc<dyn AuthClient>,
    storage: Arc<dyn SessionStorage>,
}

impl AuthSession {
    pub fn new(
        token_store: Arc<TokenStore>,
        client: Arc<dyn AuthClient>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        Self {
            token_store,
            client,
            storage,
        }
    }

    /// An unauthenticated action wants the user to log in first.
    /// `return_path` is the `path + query` to come back to afterwards.
    pub fn require_login(&self, return_path: &str) {
        self.storage.set(RETURN_PATH_KEY, return_path);
        self.token_store.notify_login_required();
    }

    /// Remember where to return before leaving for an external identity provider.
    pub fn begin_social_login(&self, return_path: &str) {
        debug!("Starting social login, will return to {}", return_path);
        self.storage.set(RETURN_PATH_KEY, return_path);
    }

    /// Drop the local session, then tell the server. The server's answer does
    /// not change the local outcome.
    pub async fn logout(&self) {
        self.token_store.set_refresh_enabled(false);
        self.token_store.clear_access_token();
        info!("Logged out locally");

        if let Err(e) = self.client.logout().await {
            debug!("Logout request failed, ignoring: {}", e);
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token_store.access_token().is_some()
    }
}
