//! Shared application state.
//!
//! Everything with application-lifetime scope is constructed once here and
//! handed out by `Arc`, so tests can build as many isolated instances as they
//! need.

use std::sync::Arc;

use serde_json::Value;

use crate::auth::{
    AuthSession, BootstrapCoordinator, LoginPrompt, Navigator, OAuthCallbackHandler,
};
use crate::client::AuthClient;
use crate::config::ConfigV1;
use crate::store::{GeoPageCache, MemorySessionStorage, SessionStorage, TokenStore};

/// Application state shared by every screen of the client.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Current access token and its listeners.
    pub token_store: Arc<TokenStore>,
    /// Main page payload prefetched at location-permission time.
    pub geo_cache: Arc<GeoPageCache<Value>>,
    /// Session-scoped storage holding the pending return path.
    pub storage: Arc<dyn SessionStorage>,
    /// Transport for the refresh and logout endpoints.
    pub client: Arc<dyn AuthClient>,
    /// The one startup sequence of this application.
    pub bootstrap: Arc<BootstrapCoordinator>,
    pub session: Arc<AuthSession>,
}

impl AppState {
    pub fn new(config: Arc<ConfigV1>, client: Arc<dyn AuthClient>) -> Self {
        Self::with_storage(config, client, Arc::new(MemorySessionStorage::new()))
    }

    pub fn with_storage(
        config: Arc<ConfigV1>,
        client: Arc<dyn AuthClient>,
        storage: Arc<dyn SessionStorage>,
    ) -> Self {
        let token_store = Arc::new(TokenStore::new());
        let bootstrap = Arc::new(BootstrapCoordinator::new(
            config.bootstrap.clone(),
            config.api.clone(),
            token_store.clone(),
            client.clone(),
        ));
        let session = Arc::new(AuthSession::new(
            token_store.clone(),
            client.clone(),
            storage.clone(),
        ));

        AppState {
            config,
            token_store,
            geo_cache: Arc::new(GeoPageCache::new()),
            storage,
            client,
            bootstrap,
            session,
        }
    }

    /// A fresh handler for one visit of the OAuth callback screen.
    pub fn oauth_callback(
        &self,
        navigator: Arc<dyn Navigator>,
        login_prompt: Arc<dyn LoginPrompt>,
    ) -> OAuthCallbackHandler {
        OAuthCallbackHandler::new(
            self.token_store.clone(),
            self.client.clone(),
            self.storage.clone(),
            navigator,
            login_prompt,
        )
    }
}
