pub mod geo_cache;
pub mod listeners;
pub mod session_storage;
pub mod token_store;

// Re-export the primary store items so code outside can do
// "use crate::store::{TokenStore, GeoPageCache};"
pub use geo_cache::{GeoCacheEntry, GeoPageCache, COORDINATE_EPSILON};
pub use listeners::{ListenerRegistry, Subscription};
pub use session_storage::{MemorySessionStorage, SessionStorage, RETURN_PATH_KEY};
pub use token_store::TokenStore;
