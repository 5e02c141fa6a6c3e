use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tracing::debug;

use super::types::ScreenState;

/// Snapshots buffered per observer before the oldest are skipped.
const BROADCAST_CAPACITY: usize = 16;

struct StoreInner {
    state: RwLock<ScreenState>,
    tx: broadcast::Sender<ScreenState>,
}

/// Shared screen state with change notification.
///
/// Cloning yields another handle to the same state. Readers get owned
/// snapshots; only the refresh controller mutates.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<StoreInner>,
}

impl StateStore {
    pub fn new(initial: ScreenState) -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                tx,
            }),
        }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> ScreenState {
        match self.inner.state.read() {
            Ok(state) => state.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Receive a snapshot after every mutation.
    ///
    /// A receiver that falls more than a few snapshots behind skips the
    /// oldest ones; the latest snapshot is always delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<ScreenState> {
        self.inner.tx.subscribe()
    }

    /// Apply `mutate` and broadcast the result.
    pub(crate) fn update(&self, mutate: impl FnOnce(&mut ScreenState)) -> ScreenState {
        let snapshot = {
            let mut state = match self.inner.state.write() {
                Ok(state) => state,
                Err(poisoned) => poisoned.into_inner(),
            };
            mutate(&mut state);
            state.clone()
        };
        self.publish(snapshot.clone());
        snapshot
    }

    /// Broadcast the current state without changing it.
    pub fn notify(&self) {
        self.publish(self.snapshot());
    }

    fn publish(&self, snapshot: ScreenState) {
        if self.inner.tx.send(snapshot).is_err() {
            debug!(
                event = "core.store.broadcast_no_receivers",
                "No observers attached, state change not delivered"
            );
        }
    }
}
