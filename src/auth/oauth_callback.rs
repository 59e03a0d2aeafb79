//! Completes a social-login redirect by exchanging the refresh cookie for an access token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::{request_access_token, AuthClient};
use crate::error::AuthError;
use crate::store::{SessionStorage, TokenStore, RETURN_PATH_KEY};

/// Message shown to the user when the callback cannot complete the login.
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please try again.";

/// Where the user lands when no return path was stored.
pub const DEFAULT_RETURN_PATH: &str = "/";

/// Replaces the current navigation entry (no back-navigation to the callback page).
pub trait Navigator: Send + Sync {
    fn replace(&self, path: &str);
}

/// Opens the login screen after a failed callback.
pub trait LoginPrompt: Send + Sync {
    fn open_login(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackState {
    Pending,
    Succeeded { redirect_to: String },
    Failed { message: String },
}

type ExchangeHandle = Shared<BoxFuture<'static, Result<String, AuthError>>>;

/// Handler for the OAuth redirect target.
///
/// `activate` may be called any number of times (once per render); only one
/// refresh request is issued and its result is processed once.
pub struct OAuthCallbackHandler {
    token_store: Arc<TokenStore>,
    client: Arc<dyn AuthClient>,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    login_prompt: Arc<dyn LoginPrompt>,
    exchange: Mutex<Option<ExchangeHandle>>,
    handled: AtomicBool,
    /// Published once the handling activation has committed its outcome.
    state: watch::Sender<CallbackState>,
}

impl OAuthCallbackHandler {
    pub fn new(
        token_store: Arc<TokenStore>,
        client: Arc<dyn AuthClient>,
        storage: Arc<dyn SessionStorage>,
        navigator: Arc<dyn Navigator>,
        login_prompt: Arc<dyn LoginPrompt>,
    ) -> Self {
        Self {
            token_store,
            client,
            storage,
            navigator,
            login_prompt,
            exchange: Mutex::new(None),
            handled: AtomicBool::new(false),
            state: watch::Sender::new(CallbackState::Pending),
        }
    }

    pub fn state(&self) -> CallbackState {
        self.state.borrow().clone()
    }

    /// Run (or join) the token exchange and process its result at most once.
    /// Returns the state after this activation.
    pub async fn activate(&self) -> CallbackState {
        let return_path = self
            .storage
            .get(RETURN_PATH_KEY)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_RETURN_PATH.to_string());

        let exchange = {
            let mut slot = self.exchange.lock().expect("exchange mutex poisoned");
            slot.get_or_insert_with(|| {
                debug!("Starting OAuth callback token exchange");
                let client = self.client.clone();
                async move { request_access_token(client.as_ref()).await }
                    .boxed()
                    .shared()
            })
            .clone()
        };

        let result = exchange.await;

        if self.handled.swap(true, Ordering::AcqRel) {
            debug!("OAuth callback result already handled");
            return self.settled_state().await;
        }

        let next = match result {
            Ok(token) => {
                self.token_store.login(token);
                self.storage.remove(RETURN_PATH_KEY);
                info!("OAuth login completed, returning to {}", return_path);
                self.navigator.replace(&return_path);
                CallbackState::Succeeded {
                    redirect_to: return_path,
                }
            }
            Err(e) => {
                warn!("OAuth callback could not obtain a token: {}", e);
                CallbackState::Failed {
                    message: LOGIN_FAILED_MESSAGE.to_string(),
                }
            }
        };

        self.state.send_replace(next.clone());
        if matches!(next, CallbackState::Failed { .. }) {
            self.login_prompt.open_login();
        }
        next
    }

    /// Wait for the handling activation to publish its outcome.
    async fn settled_state(&self) -> CallbackState {
        let mut rx = self.state.subscribe();
        let settled = rx
            .wait_for(|s| *s != CallbackState::Pending)
            .await
            .map(|s| s.clone());
        // the sender lives as long as `self`
        settled.unwrap_or_else(|_| self.state())
    }
}
