//! A tiny TTL-gated cache cell for the process-wide caches `WaymarkContext`
//! holds (glossary, selector catalog, LLKB) — each invalidated on write and
//! otherwise reused for the configured time-to-live (spec.md §5).

use std::time::{Duration, Instant};

pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<(Instant, T)>,
}

impl<T> TtlCache<T> {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Return the cached value if present and not yet expired, measured from `now`.
    pub fn get(&self, now: Instant) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|(stored_at, _)| now.duration_since(*stored_at) < self.ttl)
            .map(|(_, value)| value)
    }

    pub fn set(&mut self, now: Instant, value: T) {
        self.entry = Some((now, value));
    }

    /// Force the next `get` to miss regardless of TTL, used after a write.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_returned() {
        let mut cache = TtlCache::new(Duration::from_secs(5));
        let now = Instant::now();
        cache.set(now, 42);
        assert_eq!(cache.get(now), Some(&42));
    }

    #[test]
    fn expired_entry_is_not_returned() {
        let mut cache = TtlCache::new(Duration::from_secs(5));
        let now = Instant::now();
        cache.set(now, 42);
        let later = now + Duration::from_secs(6);
        assert_eq!(cache.get(later), None);
    }

    #[test]
    fn invalidate_clears_a_fresh_entry() {
        let mut cache = TtlCache::new(Duration::from_secs(5));
        let now = Instant::now();
        cache.set(now, 42);
        cache.invalidate();
        assert_eq!(cache.get(now), None);
    }
}
