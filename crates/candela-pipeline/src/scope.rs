//! Cancellation scope of one cycle.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancellation scope bounding the tasks of one cycle.
///
/// The scope's token is a child of the caller's token and is cancelled
/// when the reset period elapses, when [`cancel`](Self::cancel) is called,
/// when the parent is cancelled, or when the scope is dropped.
#[derive(Debug)]
pub struct CycleScope {
    id: u64,
    token: CancellationToken,
    deadline: JoinHandle<()>,
}

impl CycleScope {
    /// Opens scope `id` under `parent`, expiring after `reset_period`.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(id: u64, parent: &CancellationToken, reset_period: Duration) -> Self {
        let token = parent.child_token();
        let deadline = tokio::spawn({
            let token = token.clone();
            async move {
                tokio::select! {
                    () = token.cancelled() => {}
                    () = tokio::time::sleep(reset_period) => {
                        debug!(cycle = id, "reset period elapsed");
                        token.cancel();
                    }
                }
            }
        });
        Self { id, token, deadline }
    }

    /// Returns the cycle number.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Returns the token every task of the cycle observes.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels the cycle. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the cycle has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for CycleScope {
    fn drop(&mut self) {
        self.token.cancel();
        self.deadline.abort();
    }
}
