//! Generic read-through TTL cache.
//!
//! The cache is a capability parameterized over key and value types: a
//! [`Cache`] trait with `get`/`set`/`invalidate`, satisfied by a
//! mutex-guarded in-memory map ([`MemoryCache`]). An expired entry is
//! indistinguishable from an absent one: callers observe "miss, refetch",
//! never a stale record.
//!
//! The cache is in-memory and resets on application restart. It makes no
//! single-flight claim: concurrent misses on the same key may each invoke
//! their fetcher, which is acceptable because fetchers are stateless and
//! idempotent.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

/// Single cached value with its expiry policy.
#[derive(Clone, Debug)]
pub struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// An entry is valid iff its age has not exceeded its TTL.
    fn is_valid(&self) -> bool {
        self.stored_at.elapsed() <= self.ttl
    }
}

/// Keyed cache capability.
///
/// Implementations must be safe for concurrent readers and writers; reads of
/// a valid entry never race with a concurrent refill.
pub trait Cache<K, V>: Send + Sync {
    /// Return the value of a valid entry, or `None`. An entry found expired
    /// is deleted so it is indistinguishable from absent.
    fn get(&self, key: &K) -> Option<V>;

    /// Store a value under `key` with the given TTL, replacing any previous
    /// entry.
    fn set(&self, key: K, value: V, ttl: Duration);

    /// Remove the entry for `key`, if any.
    fn invalidate(&self, key: &K);

    /// Remove every entry.
    fn invalidate_all(&self);

    /// Number of entries currently stored, including expired entries not yet
    /// collected by a read or purge.
    fn entry_count(&self) -> usize;
}

/// Mutex-guarded in-memory cache.
pub struct MemoryCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> MemoryCache<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// The worst case after recovery is a missing or extra cache entry,
    /// which only costs an upstream refetch.
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash,
{
    /// Drop all expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.lock_entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid());
        before - entries.len()
    }
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock_entries();
        match entries.get(key) {
            Some(entry) if entry.is_valid() => Some(entry.value.clone()),
            Some(_) => {
                // Expired at read: delete so the entry cannot be observed again
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set(&self, key: K, value: V, ttl: Duration) {
        let mut entries = self.lock_entries();
        entries.insert(key, CacheEntry::new(value, ttl));
    }

    fn invalidate(&self, key: &K) {
        let mut entries = self.lock_entries();
        entries.remove(key);
    }

    fn invalidate_all(&self) {
        let mut entries = self.lock_entries();
        entries.clear();
    }

    fn entry_count(&self) -> usize {
        self.lock_entries().len()
    }
}

/// Read-through fill.
///
/// On a valid cached entry, returns it without invoking `fetcher` (zero
/// upstream calls). On miss or expiry, invokes `fetcher` synchronously
/// relative to the caller, stores the result under `key` on success, and
/// returns it. A failed fetch is never cached, so the next call retries.
pub async fn get_or_fetch<K, V, E, F, Fut>(
    cache: &dyn Cache<K, V>,
    key: K,
    ttl: Duration,
    fetcher: F,
) -> Result<V, E>
where
    K: Eq + Hash,
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
{
    if let Some(value) = cache.get(&key) {
        debug!("Cache hit");
        return Ok(value);
    }

    let value = fetcher().await?;
    cache.set(key, value.clone(), ttl);
    Ok(value)
}
