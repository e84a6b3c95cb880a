//! Per-user command serialization

use cadence_core::UserId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Idle entries are swept once the registry grows past this size
const SWEEP_THRESHOLD: usize = 1024;

/// Registry of one async mutex per user.
///
/// Commands for the same user queue up behind each other; different users
/// never contend.
#[derive(Debug, Default)]
pub struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<AsyncMutex<()>>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s playback state
    pub async fn lock(&self, user_id: &UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);

            if locks.len() >= SWEEP_THRESHOLD {
                locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            }

            Arc::clone(locks.entry(user_id.clone()).or_default())
        };

        lock.lock_owned().await
    }

    /// Number of users currently tracked
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let user = UserId::new("u");

        let guard = locks.lock(&user).await;

        let contender = {
            let locks = Arc::clone(&locks);
            let user = user.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(&user).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = UserLocks::new();

        let _alice = locks.lock(&UserId::new("alice")).await;
        let bob = tokio::time::timeout(
            Duration::from_millis(100),
            locks.lock(&UserId::new("bob")),
        )
        .await;

        assert!(bob.is_ok());
        assert_eq!(locks.len(), 2);
    }
}
