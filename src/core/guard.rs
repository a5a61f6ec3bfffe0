use log::{info, warn};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Per-target submission lock map.
///
/// At most one in-flight submission per target key at any time. The flag is
/// set before any network call begins and cleared on every exit path of that
/// submission's processing. Cloning shares the underlying map, so one store
/// can be handed to concurrently running submissions.
#[derive(Debug, Clone, Default)]
pub struct SubmissionLockStore {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl SubmissionLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` in-flight. Returns false if it already was; a rejected
    /// acquisition is not queued or retried.
    pub fn try_acquire(&self, key: &str) -> bool {
        let acquired = self.inner.lock().unwrap().insert(key.to_string());
        if acquired {
            info!("acquired submission lock for '{key}'");
        } else {
            warn!("rejected duplicate submission for '{key}'");
        }
        acquired
    }

    /// Clears the lock for `key`. Idempotent, and safe to call for a key
    /// that was never acquired.
    pub fn release(&self, key: &str) {
        if self.inner.lock().unwrap().remove(key) {
            info!("released submission lock for '{key}'");
        }
    }

    #[allow(dead_code)]
    pub fn is_locked(&self, key: &str) -> bool {
        self.inner.lock().unwrap().contains(key)
    }

    /// Scoped acquisition: the returned permit releases the key when dropped,
    /// on every exit path of the holder.
    pub fn acquire(&self, key: &str) -> Option<SubmissionPermit> {
        if self.try_acquire(key) {
            Some(SubmissionPermit {
                store: self.clone(),
                key: key.to_string(),
            })
        } else {
            None
        }
    }
}

/// Exclusive hold on one target key, released on drop.
#[derive(Debug)]
pub struct SubmissionPermit {
    store: SubmissionLockStore,
    key: String,
}

impl SubmissionPermit {
    #[allow(dead_code)]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.store.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_for_same_key_is_rejected() {
        let store = SubmissionLockStore::new();
        assert!(store.try_acquire("auction-7"));
        assert!(!store.try_acquire("auction-7"));
    }

    #[test]
    fn distinct_keys_do_not_contend() {
        let store = SubmissionLockStore::new();
        assert!(store.try_acquire("auction-7"));
        assert!(store.try_acquire("auction-8"));
    }

    #[test]
    fn release_makes_key_acquirable_again() {
        let store = SubmissionLockStore::new();
        assert!(store.try_acquire("auction-7"));
        store.release("auction-7");
        assert!(store.try_acquire("auction-7"));
    }

    #[test]
    fn release_is_idempotent_and_safe_without_acquire() {
        let store = SubmissionLockStore::new();
        store.release("never-acquired");
        assert!(store.try_acquire("never-acquired"));
        store.release("never-acquired");
        store.release("never-acquired");
        assert!(!store.is_locked("never-acquired"));
    }

    #[test]
    fn permit_releases_on_drop() {
        let store = SubmissionLockStore::new();
        {
            let permit = store.acquire("auction-7").unwrap();
            assert_eq!(permit.key(), "auction-7");
            assert!(store.is_locked("auction-7"));
            assert!(store.acquire("auction-7").is_none());
        }
        assert!(!store.is_locked("auction-7"));
    }

    #[test]
    fn clones_share_the_same_lock_map() {
        let store = SubmissionLockStore::new();
        let other = store.clone();
        assert!(store.try_acquire("auction-7"));
        assert!(!other.try_acquire("auction-7"));
        other.release("auction-7");
        assert!(!store.is_locked("auction-7"));
    }
}
