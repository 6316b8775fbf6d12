//! URL-keyed byte cache for fetched volume payloads.
//!
//! An explicit, injectable service rather than a module-global map, so
//! the app owns one instance and tests can substitute a fresh one.
//! Reload and the raw-file download reuse a cached payload instead of
//! re-fetching.

use std::collections::HashMap;

/// Byte cache keyed by volume URL, with a soft capacity in bytes.
///
/// Eviction is insertion-ordered (oldest first) and only runs when an
/// insert pushes the total past the capacity.
pub struct SourceCache {
    capacity_bytes: usize,
    total_bytes: usize,
    entries: HashMap<String, Vec<u8>>,
    insertion_order: Vec<String>,
}

impl SourceCache {
    /// Create a cache with the given soft capacity in bytes.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            total_bytes: 0,
            entries: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Store a payload under its URL, evicting oldest entries if needed.
    /// A payload larger than the whole capacity is not cached at all.
    pub fn populate(&mut self, url: &str, bytes: Vec<u8>) {
        if bytes.len() > self.capacity_bytes {
            log::debug!(
                "payload for {url:?} ({} bytes) exceeds cache capacity, not caching",
                bytes.len()
            );
            return;
        }
        self.remove(url);
        self.total_bytes += bytes.len();
        self.entries.insert(url.to_string(), bytes);
        self.insertion_order.push(url.to_string());

        while self.total_bytes > self.capacity_bytes && !self.insertion_order.is_empty() {
            let oldest = self.insertion_order.remove(0);
            if let Some(evicted) = self.entries.remove(&oldest) {
                self.total_bytes -= evicted.len();
                log::debug!("evicted {oldest:?} from source cache ({} bytes)", evicted.len());
            }
        }
    }

    /// Look up a cached payload.
    pub fn lookup(&self, url: &str) -> Option<&[u8]> {
        self.entries.get(url).map(Vec::as_slice)
    }

    /// Drop one entry.
    pub fn remove(&mut self, url: &str) {
        if let Some(old) = self.entries.remove(url) {
            self.total_bytes -= old.len();
            self.insertion_order.retain(|u| u != url);
        }
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
        self.total_bytes = 0;
    }

    /// Number of cached payloads.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total cached bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }
}

impl Default for SourceCache {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_and_lookup() {
        let mut cache = SourceCache::new(1024);
        cache.populate("/a.nii", vec![1, 2, 3]);
        assert_eq!(cache.lookup("/a.nii"), Some(&[1u8, 2, 3][..]));
        assert_eq!(cache.lookup("/b.nii"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_bytes(), 3);
    }

    #[test]
    fn test_repopulate_replaces_entry() {
        let mut cache = SourceCache::new(1024);
        cache.populate("/a.nii", vec![1; 10]);
        cache.populate("/a.nii", vec![2; 4]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.total_bytes(), 4);
        assert_eq!(cache.lookup("/a.nii"), Some(&[2u8; 4][..]));
    }

    #[test]
    fn test_eviction_is_oldest_first() {
        let mut cache = SourceCache::new(10);
        cache.populate("/a", vec![0; 4]);
        cache.populate("/b", vec![0; 4]);
        // Pushes total to 12; "/a" goes.
        cache.populate("/c", vec![0; 4]);
        assert!(cache.lookup("/a").is_none());
        assert!(cache.lookup("/b").is_some());
        assert!(cache.lookup("/c").is_some());
        assert_eq!(cache.total_bytes(), 8);
    }

    #[test]
    fn test_oversized_payload_is_not_cached() {
        let mut cache = SourceCache::new(8);
        cache.populate("/big", vec![0; 64]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache = SourceCache::new(1024);
        cache.populate("/a", vec![0; 4]);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.total_bytes(), 0);
    }
}
