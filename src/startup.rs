//! Application startup.
//!
//! Builds the shared state from configuration and runs the startup sequence
//! the loading screen waits on.

use std::sync::Arc;

use tracing::info;

use crate::auth::BootstrapOutcome;
use crate::client::create_auth_client;
use crate::config::ConfigV1;
use crate::error::AuthError;
use crate::state::AppState;

/// Wire up the application state with the HTTP auth client.
pub fn build_state(config: Arc<ConfigV1>) -> Result<AppState, AuthError> {
    let client = create_auth_client(&config.api)?;
    Ok(AppState::new(config, client))
}

/// Builds the state and waits for the startup sequence to finish.
///
/// # Errors
///
/// Returns an error only if the HTTP client cannot be constructed; an
/// unauthenticated startup is a normal outcome.
pub async fn run(
    config: Arc<ConfigV1>,
) -> Result<(AppState, BootstrapOutcome), Box<dyn std::error::Error>> {
    let state = build_state(config)?;

    info!(
        "Starting session bootstrap against {}",
        state.config.api.base_url
    );
    let outcome = state.bootstrap.bootstrap().await;

    if let Some(expiry) = state.token_store.current_token_expiry() {
        let expires_at = chrono::DateTime::from_timestamp_millis(expiry)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| expiry.to_string());
        info!("Session token expires at {}", expires_at);
    }

    Ok((state, outcome))
}
