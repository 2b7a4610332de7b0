//! Time-bounded memoization for expensive fetches.
//!
//! The cache belongs to the caller; analysis code never touches it. Time comes
//! from an injected `Clock` so expiry is testable without sleeping.

use std::cell::Cell;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

// Longer TTLs are clamped; chrono durations have a bounded range.
const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 3600;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.stored_at < ttl
    }
}

#[derive(Debug)]
pub struct TtlCache<V, C = SystemClock> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: C,
}

impl<V> TtlCache<V, SystemClock> {
    pub fn with_system_clock(ttl_secs: u64) -> Self {
        Self::new(ttl_secs, SystemClock)
    }
}

impl<V, C: Clock> TtlCache<V, C> {
    pub fn new(ttl_secs: u64, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl: Duration::seconds(ttl_secs.min(MAX_TTL_SECS) as i64),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Fresh value for `key`, if any. Expired entries are left in place until
    /// overwritten or purged.
    pub fn get(&self, key: &str) -> Option<&V> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now, self.ttl))
            .map(|entry| &entry.value)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let stored_at = self.clock.now();
        self.entries
            .insert(key.into(), CacheEntry { value, stored_at });
    }

    pub fn invalidate(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now();
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now, ttl));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the fresh value for `key`, or runs `fetch` and stores its result.
    /// A failed fetch leaves the cache unchanged.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: &str,
        fetch: impl FnOnce() -> Result<V, E>,
    ) -> Result<&V, E> {
        let now = self.clock.now();
        let ttl = self.ttl;
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut slot) => {
                if slot.get().is_fresh(now, ttl) {
                    debug!("cache hit: {key}");
                } else {
                    debug!("cache expired: {key}");
                    let value = fetch()?;
                    slot.insert(CacheEntry {
                        value,
                        stored_at: now,
                    });
                }
                Ok(&slot.into_mut().value)
            }
            Entry::Vacant(slot) => {
                debug!("cache miss: {key}");
                let value = fetch()?;
                Ok(&slot
                    .insert(CacheEntry {
                        value,
                        stored_at: now,
                    })
                    .value)
            }
        }
    }
}
