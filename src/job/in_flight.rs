//! Per-key locks that let concurrent cold-cache runs share one request.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type Slot = Arc<AsyncMutex<()>>;

#[derive(Default)]
pub(crate) struct InFlight {
    slots: Mutex<HashMap<String, Slot>>,
}

impl InFlight {
    /// Wait until no other run holds `key`, then hold it until the returned
    /// guard drops.
    pub(crate) async fn acquire(&self, key: &str) -> InFlightGuard<'_> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key.to_owned()).or_default())
        };
        let guard = slot.lock_owned().await;
        InFlightGuard {
            registry: self,
            key: key.to_owned(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

pub(crate) struct InFlightGuard<'a> {
    registry: &'a InFlight,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let Some(guard) = self.guard.take() else {
            return;
        };
        let mut slots = self
            .registry
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot = Arc::clone(OwnedMutexGuard::mutex(&guard));
        drop(guard);
        // Map + `slot` only: nobody is waiting on this key.
        if Arc::strong_count(&slot) <= 2 {
            slots.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn slot_is_released_after_last_holder() {
        let registry = InFlight::default();
        {
            let _guard = registry.acquire("a").await;
            assert_eq!(registry.len(), 1);
        }
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn second_holder_waits_for_the_first() {
        let registry = Arc::new(InFlight::default());
        let first = registry.acquire("a").await;

        let waiter = {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let _guard = registry.acquire("a").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        drop(first);
        waiter.await.unwrap();
        assert_eq!(registry.len(), 0);
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let registry = InFlight::default();
        let _a = registry.acquire("a").await;
        let _b = registry.acquire("b").await;
        assert_eq!(registry.len(), 2);
    }
}
