//! Timeout and timing helpers for async operations

use std::future::Future;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error returned by [`with_timeout`]
#[derive(Debug, Error)]
pub enum TimeoutError<E> {
    /// Operation completed but failed
    #[error("{0}")]
    Failed(E),
    /// Operation did not finish in time
    #[error("timed out after {0:?}")]
    Elapsed(Duration),
}

impl<E> TimeoutError<E> {
    /// Whether the deadline expired before the operation finished
    pub fn is_elapsed(&self) -> bool {
        matches!(self, TimeoutError::Elapsed(_))
    }
}

/// Execute a fallible async operation with a deadline.
///
/// The operation is dropped (and therefore cancelled) when the deadline
/// expires.
pub async fn with_timeout<F, T, E>(duration: Duration, operation: F) -> Result<T, TimeoutError<E>>
where
    F: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(duration, operation).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => Err(TimeoutError::Failed(error)),
        Err(_elapsed) => Err(TimeoutError::Elapsed(duration)),
    }
}

/// Await a future and report how long it took.
pub async fn timed<F>(future: F) -> (F::Output, Duration)
where
    F: Future,
{
    let start = Instant::now();
    let output = future.await;
    (output, start.elapsed())
}
