//! Event lifetime extension.

use std::future::Future;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

use crate::error::WorkerError;

/// Completion token carried by every lifecycle and functional event.
///
/// Work registered with [`wait_until`](Self::wait_until) keeps the event
/// open. The host drives it with [`settle`](Self::settle); the worker may be
/// suspended only after that returns.
#[derive(Default)]
pub struct ExtendableEvent {
    pending: Vec<BoxFuture<'static, Result<(), WorkerError>>>,
}

impl ExtendableEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wait_until<F>(&mut self, work: F)
    where
        F: Future<Output = Result<(), WorkerError>> + Send + 'static,
    {
        self.pending.push(work.boxed());
    }

    /// Number of registered, not yet settled, futures.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drive every registered future to completion. All of them run even if
    /// one fails; the first error is returned.
    pub async fn settle(self) -> Result<(), WorkerError> {
        join_all(self.pending).await.into_iter().collect()
    }
}

impl std::fmt::Debug for ExtendableEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtendableEvent")
            .field("pending", &self.pending.len())
            .finish()
    }
}
