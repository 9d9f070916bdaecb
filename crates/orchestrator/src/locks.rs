//! Per-conversation serialization.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Map size at which idle entries get pruned on the next acquire.
const PRUNE_THRESHOLD: usize = 1024;

/// Keyed async mutex map. One lock per (tenant, contact) pair so the
/// cooldown check and the reply that follows it are atomic per
/// conversation, while unrelated conversations proceed concurrently.
#[derive(Debug, Default)]
pub struct ConversationLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a conversation key, waiting if another task
    /// holds it. The guard releases on drop.
    pub async fn acquire(&self, key: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            if map.len() >= PRUNE_THRESHOLD {
                map.retain(|_, m| Arc::strong_count(m) > 1);
            }
            map.entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
