use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::types::UserId;

/// What the next free-text message from a user is expected to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOp {
    AwaitingNumbers,
    AwaitingContestId,
    AwaitingPastCheck,
    AwaitingDeleteId,
}

/// Per-user conversation state. A user with no entry is idle.
#[derive(Default)]
pub struct SessionContext {
    pending: Mutex<HashMap<UserId, PendingOp>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<UserId, PendingOp>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin(&self, user: UserId, op: PendingOp) {
        debug!("user {} -> {:?}", user, op);
        self.pending().insert(user, op);
    }

    pub fn current(&self, user: UserId) -> Option<PendingOp> {
        self.pending().get(&user).copied()
    }

    pub fn reset(&self, user: UserId) {
        if self.pending().remove(&user).is_some() {
            debug!("user {} -> idle", user);
        }
    }
}
