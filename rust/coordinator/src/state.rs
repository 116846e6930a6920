//! In-memory state management for the coordinator service.

use tokio::sync::RwLock;

use tilefarm_core::{CoordinatorConfig, Dispatcher, Operation, Reply, StatusSnapshot};

/// Main coordinator state container.
///
/// Every worker request takes the write lock for the duration of one
/// transition, so transitions never interleave. The status reporter only
/// takes the read lock.
pub struct CoordinatorState {
    dispatcher: RwLock<Dispatcher>,
}

impl CoordinatorState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: RwLock::new(dispatcher),
        }
    }

    pub fn from_config(config: &CoordinatorConfig) -> Self {
        Self::new(Dispatcher::from_config(config))
    }

    /// Apply one worker operation.
    pub async fn apply(&self, op: Operation) -> Reply {
        let mut dispatcher = self.dispatcher.write().await;
        dispatcher.dispatch(op)
    }

    /// Read-only progress snapshot.
    pub async fn snapshot(&self) -> StatusSnapshot {
        let dispatcher = self.dispatcher.read().await;
        dispatcher.snapshot()
    }
}
