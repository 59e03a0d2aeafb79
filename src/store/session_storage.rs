use std::collections::HashMap;
use std::sync::Mutex;

/// Key under which the path to return to after login is kept.
pub const RETURN_PATH_KEY: &str = "auth.returnPath";

/// Session-scoped key/value storage (the browser's `sessionStorage` in a web client).
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Process-local storage that lives as long as the value itself.
#[derive(Default)]
pub struct MemorySessionStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("session storage mutex poisoned")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("session storage mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .expect("session storage mutex poisoned")
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let storage = MemorySessionStorage::new();
        assert_eq!(storage.get(RETURN_PATH_KEY), None);

        storage.set(RETURN_PATH_KEY, "/stores?page=2");
        assert_eq!(
            storage.get(RETURN_PATH_KEY),
            Some("/stores?page=2".to_string())
        );

        storage.remove(RETURN_PATH_KEY);
        assert_eq!(storage.get(RETURN_PATH_KEY), None);
    }
}
