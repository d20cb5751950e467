//! Per-Key Mutex Registry
//!
//! One async mutex per account address, created lazily and never evicted.
//! Distinct keys never block each other; waiters on the same key are woken
//! in FIFO order (tokio's mutex is fair).

use dashmap::DashMap;
use std::sync::{Arc, OnceLock};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

/// Registry of named submission locks.
#[derive(Debug, Default)]
pub struct KeyedLockRegistry {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Scoped handle for one key. Dropping it releases the lock on every exit path.
#[derive(Debug)]
pub struct KeyGuard {
    key: String,
    _guard: OwnedMutexGuard<()>,
}

impl KeyGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        trace!(key = %self.key, "Released submission lock");
    }
}

impl KeyedLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry shared by every sender in the process.
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<KeyedLockRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(|| Arc::new(Self::new())).clone()
    }

    /// Get or atomically create the lock for `key`.
    ///
    /// The shard guard is dropped before returning so no map lock is held
    /// across an await.
    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(key) {
            return lock.clone();
        }
        self.locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: &str) -> KeyGuard {
        let lock = self.lock_for(key);
        let guard = lock.lock_owned().await;
        trace!(key = %key, "Acquired submission lock");
        KeyGuard {
            key: key.to_string(),
            _guard: guard,
        }
    }

    /// Take the lock for `key` only if nobody holds it.
    pub fn try_acquire(&self, key: &str) -> Option<KeyGuard> {
        let lock = self.lock_for(key);
        let guard = lock.try_lock_owned().ok()?;
        Some(KeyGuard {
            key: key.to_string(),
            _guard: guard,
        })
    }

    /// Whether `key` is currently held. Unknown keys are never held.
    pub fn is_locked(&self, key: &str) -> bool {
        let Some(lock) = self.locks.get(key) else {
            return false;
        };
        let held = lock.try_lock().is_err();
        held
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
