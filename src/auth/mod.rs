pub mod bootstrap;
pub mod oauth_callback;
pub mod session;

pub use bootstrap::{BootstrapCoordinator, BootstrapOutcome};
pub use oauth_callback::{CallbackState, LoginPrompt, Navigator, OAuthCallbackHandler};
pub use session::AuthSession;
