//! Single-resolution completion slot for route execution
//!
//! The engine receives a [`CompletionHandle`]; the orchestrator keeps the
//! matching [`CompletionSlot`]. A second delivery is rejected with
//! `CompletionAlreadyDelivered` so a misbehaving engine cannot overwrite the
//! recorded hash.

use super::RouteState;
use crate::error::{OrchestratorError, OrchestratorResult};

use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Final notification from the route engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCompletion {
    pub chain_id: String,
    pub tx_hash: String,
    pub state: RouteState,
}

/// Sending half, handed to the route engine
#[derive(Debug, Clone)]
pub struct CompletionHandle {
    sender: Arc<Mutex<Option<oneshot::Sender<RouteCompletion>>>>,
}

/// Receiving half, kept by the orchestrator
#[derive(Debug)]
pub struct CompletionSlot {
    receiver: oneshot::Receiver<RouteCompletion>,
}

/// Create a connected handle/slot pair
pub fn completion_channel() -> (CompletionHandle, CompletionSlot) {
    let (tx, rx) = oneshot::channel();
    (
        CompletionHandle {
            sender: Arc::new(Mutex::new(Some(tx))),
        },
        CompletionSlot { receiver: rx },
    )
}

impl CompletionHandle {
    /// Deliver the terminal hash. Only the first call succeeds.
    pub fn complete(&self, completion: RouteCompletion) -> OrchestratorResult<()> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        match sender {
            Some(sender) => {
                debug!(
                    "Route completed on {} with {}",
                    completion.chain_id, completion.tx_hash
                );
                sender.send(completion).map_err(|_| {
                    OrchestratorError::Internal("completion slot dropped".to_string())
                })
            }
            None => {
                warn!(
                    "Ignoring repeated route completion {} on {}",
                    completion.tx_hash, completion.chain_id
                );
                Err(OrchestratorError::CompletionAlreadyDelivered)
            }
        }
    }

    /// Whether a completion has already been delivered through any clone
    pub fn is_completed(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl CompletionSlot {
    /// Take the delivered completion, if any, without waiting
    pub fn take(mut self) -> Option<RouteCompletion> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the completion; `None` if every handle was dropped first
    pub async fn wait(self) -> Option<RouteCompletion> {
        self.receiver.await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(hash: &str) -> RouteCompletion {
        RouteCompletion {
            chain_id: "osmosis-1".to_string(),
            tx_hash: hash.to_string(),
            state: RouteState::CompletedSuccess,
        }
    }

    #[test]
    fn test_first_delivery_wins() {
        let (handle, slot) = completion_channel();
        let clone = handle.clone();

        assert!(handle.complete(completion("FIRST")).is_ok());
        assert!(matches!(
            clone.complete(completion("SECOND")),
            Err(OrchestratorError::CompletionAlreadyDelivered)
        ));
        assert!(handle.is_completed());
        assert_eq!(slot.take().unwrap().tx_hash, "FIRST");
    }

    #[test]
    fn test_empty_slot_yields_none() {
        let (handle, slot) = completion_channel();
        assert!(!handle.is_completed());
        assert!(slot.take().is_none());
    }

    #[tokio::test]
    async fn test_delivery_from_another_task() {
        let (handle, slot) = completion_channel();
        tokio::spawn(async move {
            handle.complete(completion("SPAWNED")).unwrap();
        });
        assert_eq!(slot.wait().await.unwrap().tx_hash, "SPAWNED");
    }
}
