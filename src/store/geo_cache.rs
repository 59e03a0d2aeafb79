use std::sync::Mutex;

use tracing::debug;

/// Maximum per-axis distance, in degrees, for two samples to count as the
/// same location (roughly 11 meters).
pub const COORDINATE_EPSILON: f64 = 0.0001;

/// The single cached payload and the coordinates it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoCacheEntry<T> {
    pub data: T,
    pub latitude: f64,
    pub longitude: f64,
}

impl<T> GeoCacheEntry<T> {
    pub fn matches(&self, latitude: f64, longitude: f64) -> bool {
        (self.latitude - latitude).abs() < COORDINATE_EPSILON
            && (self.longitude - longitude).abs() < COORDINATE_EPSILON
    }
}

/// Capacity-one cache for the main page payload, keyed by location.
///
/// Every read empties the slot, hit or miss.
pub struct GeoPageCache<T> {
    slot: Mutex<Option<GeoCacheEntry<T>>>,
}

impl<T> GeoPageCache<T> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    pub fn set_main_page_cache(&self, data: T, latitude: f64, longitude: f64) {
        debug!(latitude, longitude, "Seeding main page cache");
        *self.slot.lock().expect("geo cache mutex poisoned") = Some(GeoCacheEntry {
            data,
            latitude,
            longitude,
        });
    }

    pub fn get_main_page_cache(&self, latitude: f64, longitude: f64) -> Option<T> {
        // take() under the same lock as the match check
        let entry = self.slot.lock().expect("geo cache mutex poisoned").take()?;
        if entry.matches(latitude, longitude) {
            debug!(latitude, longitude, "Main page cache hit");
            Some(entry.data)
        } else {
            debug!(
                latitude,
                longitude,
                cached_latitude = entry.latitude,
                cached_longitude = entry.longitude,
                "Main page cache miss, discarding entry"
            );
            None
        }
    }

    pub fn clear_main_page_cache(&self) {
        self.slot.lock().expect("geo cache mutex poisoned").take();
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().expect("geo cache mutex poisoned").is_none()
    }
}

impl<T> Default for GeoPageCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_within_epsilon_then_empty() {
        let cache = GeoPageCache::new();
        cache.set_main_page_cache("data", 37.5000, 127.0000);

        assert_eq!(cache.get_main_page_cache(37.50005, 127.00005), Some("data"));
        assert_eq!(cache.get_main_page_cache(37.50005, 127.00005), None);
    }

    #[test]
    fn test_latitude_mismatch_misses_and_clears() {
        let cache = GeoPageCache::new();
        cache.set_main_page_cache("data", 37.6000, 127.0000);

        assert_eq!(cache.get_main_page_cache(37.5000, 127.0000), None);
        assert!(cache.is_empty());
        assert_eq!(cache.get_main_page_cache(37.6000, 127.0000), None);
    }

    #[test]
    fn test_longitude_mismatch_misses() {
        let cache = GeoPageCache::new();
        cache.set_main_page_cache(1, 37.5, 127.0);

        assert_eq!(cache.get_main_page_cache(37.5, 127.0002), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_write_replaces_previous_entry() {
        let cache = GeoPageCache::new();
        cache.set_main_page_cache("first", 10.0, 10.0);
        cache.set_main_page_cache("second", 20.0, 20.0);

        assert_eq!(cache.get_main_page_cache(20.0, 20.0), Some("second"));

        cache.set_main_page_cache("first", 10.0, 10.0);
        cache.set_main_page_cache("second", 20.0, 20.0);
        assert_eq!(cache.get_main_page_cache(10.0, 10.0), None);
    }

    #[test]
    fn test_explicit_clear() {
        let cache = GeoPageCache::new();
        cache.set_main_page_cache("data", 1.0, 2.0);
        cache.clear_main_page_cache();

        assert!(cache.is_empty());
        assert_eq!(cache.get_main_page_cache(1.0, 2.0), None);
    }

    #[test]
    fn test_empty_cache_read_and_nan() {
        let cache: GeoPageCache<&str> = GeoPageCache::new();
        assert_eq!(cache.get_main_page_cache(0.0, 0.0), None);

        cache.set_main_page_cache("data", 1.0, 2.0);
        assert_eq!(cache.get_main_page_cache(f64::NAN, 2.0), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_epsilon_is_strict() {
        let entry = GeoCacheEntry {
            data: (),
            latitude: 0.0,
            longitude: 0.0,
        };
        assert!(entry.matches(0.00009, -0.00009));
        assert!(!entry.matches(0.0002, 0.0));
    }
}
