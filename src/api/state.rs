use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::UserId;
use crate::services::PersonalizationEngine;

type LockMap = Arc<StdMutex<HashMap<UserId, Arc<Mutex<()>>>>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: PersonalizationEngine,
    user_locks: LockMap,
}

impl AppState {
    pub fn new(engine: PersonalizationEngine) -> Self {
        Self {
            engine,
            user_locks: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Serializes load-mutate-save cycles for one user within this process
    ///
    /// Hold the guard until the profile has been saved. The map entry is removed
    /// when the last holder or waiter for that user lets go.
    pub async fn lock_user(&self, user_id: &UserId) -> UserLockGuard {
        let lock = {
            let mut locks = self.user_locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks
                .entry(user_id.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let guard = lock.lock_owned().await;
        UserLockGuard {
            user_id: user_id.clone(),
            locks: self.user_locks.clone(),
            guard: Some(guard),
        }
    }

    /// Number of users with a live lock entry
    pub fn locked_users(&self) -> usize {
        self.user_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Exclusive write access to one user's profile
///
/// `Send`, so it can travel into a blocking task with the save it protects.
pub struct UserLockGuard {
    user_id: UserId,
    locks: LockMap,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Waiters clone the Arc under the map lock before awaiting, so a count of
        // one means nobody else is queued for this user.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::db::{CatalogStore, ProfileStore};

    fn state() -> AppState {
        let engine = PersonalizationEngine::new(
            Arc::new(ProfileStore::new("/nonexistent")),
            CatalogStore::new("/nonexistent/catalog.json"),
        );
        AppState::new(engine)
    }

    fn user(id: &str) -> UserId {
        id.parse().unwrap()
    }

    #[tokio::test]
    async fn test_lock_entry_removed_after_release() {
        let state = state();
        for id in ["u1", "u2", "u3"] {
            let _guard = state.lock_user(&user(id)).await;
            assert_eq!(state.locked_users(), 1);
        }
        assert_eq!(state.locked_users(), 0);
    }

    #[tokio::test]
    async fn test_waiter_keeps_entry_alive() {
        let state = state();
        let first = state.lock_user(&user("alice")).await;

        let waiter = {
            let state = state.clone();
            tokio::spawn(async move {
                let _guard = state.lock_user(&user("alice")).await;
            })
        };
        // Let the waiter queue up behind the first guard
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(first);
        assert_eq!(state.locked_users(), 1);

        waiter.await.unwrap();
        assert_eq!(state.locked_users(), 0);
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let state = state();
        let _alice = state.lock_user(&user("alice")).await;
        let bob = tokio::time::timeout(Duration::from_millis(50), state.lock_user(&user("bob")))
            .await;
        assert!(bob.is_ok());
    }
}
