use std::sync::RwLock;

use tracing::debug;

use super::listeners::{ListenerRegistry, Subscription};
use crate::models::token::{decode_expiry_millis, TokenRecord};

/// Holds the current access token and the refresh-enabled flag.
///
/// All mutation goes through this type; token-change listeners are notified on
/// every write, whether or not the value changed.
pub struct TokenStore {
    record: RwLock<TokenRecord>,
    token_listeners: ListenerRegistry<Option<String>>,
    login_required_listeners: ListenerRegistry<()>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self {
            record: RwLock::new(TokenRecord::default()),
            token_listeners: ListenerRegistry::new(),
            login_required_listeners: ListenerRegistry::new(),
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.record
            .read()
            .expect("token store lock poisoned")
            .access_token
            .clone()
    }

    pub fn set_access_token(&self, token: Option<String>) {
        debug!(present = token.is_some(), "Access token updated");
        self.record
            .write()
            .expect("token store lock poisoned")
            .access_token = token.clone();
        self.token_listeners.notify(&token);
    }

    pub fn clear_access_token(&self) {
        self.set_access_token(None);
    }

    /// Commit a token obtained from an interactive login.
    pub fn login(&self, token: String) {
        self.set_refresh_enabled(true);
        self.set_access_token(Some(token));
    }

    pub fn refresh_enabled(&self) -> bool {
        self.record
            .read()
            .expect("token store lock poisoned")
            .refresh_enabled
    }

    pub fn set_refresh_enabled(&self, enabled: bool) {
        self.record
            .write()
            .expect("token store lock poisoned")
            .refresh_enabled = enabled;
    }

    pub fn snapshot(&self) -> TokenRecord {
        self.record.read().expect("token store lock poisoned").clone()
    }

    pub fn subscribe_token_change<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Option<String>) + Send + Sync + 'static,
    {
        self.token_listeners.subscribe(listener)
    }

    pub fn subscribe_login_required<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&()) + Send + Sync + 'static,
    {
        self.login_required_listeners.subscribe(listener)
    }

    pub fn notify_login_required(&self) {
        debug!(
            listeners = self.login_required_listeners.len(),
            "Broadcasting login required"
        );
        self.login_required_listeners.notify(&());
    }

    /// Expiry of `token` in epoch milliseconds. Malformed tokens yield `None`.
    pub fn token_expiry(token: &str) -> Option<i64> {
        decode_expiry_millis(token)
    }

    pub fn current_token_expiry(&self) -> Option<i64> {
        self.access_token().as_deref().and_then(Self::token_expiry)
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}
