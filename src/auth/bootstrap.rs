//! One-time application startup: silent token refresh plus a minimum splash duration.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::client::{request_access_token, AuthClient, MockHandlers};
use crate::config::{ApiConfig, BootstrapConfig};
use crate::store::TokenStore;

/// What every bootstrap caller receives once the startup sequence is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    /// Whether the silent refresh produced a token.
    pub authenticated: bool,
    /// Total time from the start of the sequence, splash wait included.
    pub elapsed: Duration,
}

type BootstrapHandle = Shared<BoxFuture<'static, BootstrapOutcome>>;

/// Runs the startup sequence at most once, however many callers ask for it.
///
/// The first call to [`BootstrapCoordinator::bootstrap`] creates a shared
/// handle; every caller, the first included, awaits that same handle.
pub struct BootstrapCoordinator {
    config: BootstrapConfig,
    api: ApiConfig,
    token_store: Arc<TokenStore>,
    client: Arc<dyn AuthClient>,
    handle: Mutex<Option<BootstrapHandle>>,
}

impl BootstrapCoordinator {
    pub fn new(
        config: BootstrapConfig,
        api: ApiConfig,
        token_store: Arc<TokenStore>,
        client: Arc<dyn AuthClient>,
    ) -> Self {
        Self {
            config,
            api,
            token_store,
            client,
            handle: Mutex::new(None),
        }
    }

    /// Join the startup sequence, starting it if nobody has yet. Never fails.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let handle = {
            let mut slot = self.handle.lock().expect("bootstrap mutex poisoned");
            slot.get_or_insert_with(|| {
                debug!("Creating bootstrap handle");
                run_sequence(
                    self.config.clone(),
                    self.api.clone(),
                    self.token_store.clone(),
                    self.client.clone(),
                )
                .boxed()
                .shared()
            })
            .clone()
        };
        handle.await
    }

    /// True when a token is already present, so there is nothing to wait for.
    pub fn initial_ready(&self) -> bool {
        self.token_store.access_token().is_some()
    }

    /// Resolve once the app can render: immediately with an existing session,
    /// otherwise after the shared bootstrap completes.
    pub async fn wait_until_ready(&self) {
        if self.initial_ready() {
            debug!("Session already present, skipping bootstrap wait");
            return;
        }
        self.bootstrap().await;
    }

    /// Whether the startup sequence has run to completion.
    pub fn is_bootstrapped(&self) -> bool {
        self.handle
            .lock()
            .expect("bootstrap mutex poisoned")
            .as_ref()
            .and_then(|handle| handle.peek())
            .is_some()
    }
}

async fn run_sequence(
    config: BootstrapConfig,
    api: ApiConfig,
    token_store: Arc<TokenStore>,
    client: Arc<dyn AuthClient>,
) -> BootstrapOutcome {
    let started = Instant::now();
    info!(use_mock_data = config.use_mock_data, "Bootstrap started");

    if config.use_mock_data {
        client.register_mock_handlers(MockHandlers::fixtures(&api));
    }

    token_store.set_refresh_enabled(true);

    // An unauthenticated visitor is a normal outcome, so the error stops here.
    let authenticated = match request_access_token(client.as_ref()).await {
        Ok(token) => {
            token_store.set_access_token(Some(token));
            true
        }
        Err(e) => {
            debug!("Silent refresh did not produce a session: {}", e);
            token_store.clear_access_token();
            false
        }
    };

    token_store.set_refresh_enabled(true);

    let floor = Duration::from_millis(config.min_splash_ms);
    let refresh_elapsed = started.elapsed();
    if let Some(remaining) = floor.checked_sub(refresh_elapsed).filter(|d| !d.is_zero()) {
        debug!(
            remaining_ms = remaining.as_millis() as u64,
            "Holding splash screen"
        );
        sleep(remaining).await;
    }

    let outcome = BootstrapOutcome {
        authenticated,
        elapsed: started.elapsed(),
    };
    info!(
        authenticated = outcome.authenticated,
        elapsed_ms = outcome.elapsed.as_millis() as u64,
        "Bootstrap finished"
    );
    outcome
}
