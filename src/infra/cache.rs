//! In-memory cache with an explicit expiry timestamp.
//!
//! The cache is an ordinary value: build it once at startup and hand it to
//! whatever needs it by reference. There is no global instance.

use std::time::Duration;

use time::OffsetDateTime;
use tracing::debug;

/// How long fee tables read from the settings file stay fresh.
pub const FEE_TABLES_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Debug)]
struct CacheEntry<T> {
    value: T,
    expires_at: OffsetDateTime,
}

#[derive(Clone, Debug)]
pub struct ExpiringCache<T> {
    name: &'static str,
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
}

impl<T> ExpiringCache<T> {
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entry: None,
        }
    }

    /// Returns the cached value, reloading it first when missing or expired.
    ///
    /// A failed reload leaves the cache empty.
    pub fn get_or_try_refresh<E>(
        &mut self,
        now: OffsetDateTime,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<&T, E> {
        let entry = match self.entry.take() {
            Some(entry) if entry.expires_at > now => entry,
            stale => {
                debug!(
                    cache = self.name,
                    expired = stale.is_some(),
                    "cache miss, reloading"
                );
                let value = load()?;
                CacheEntry {
                    value,
                    expires_at: now + self.ttl,
                }
            }
        };
        Ok(&self.entry.insert(entry).value)
    }

    pub fn expires_at(&self) -> Option<OffsetDateTime> {
        self.entry.as_ref().map(|entry| entry.expires_at)
    }
}
