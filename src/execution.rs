//! # Deadline-Bounded Execution
//!
//! Every public operation carries an [`OperationContext`] holding the
//! caller's deadline. Store calls that have no cancellation hook of their
//! own run through [`run_detached`]: the call becomes an independent task
//! that publishes its single outcome on a oneshot channel, and the caller
//! races that outcome against the deadline.
//!
//! When the deadline wins the caller gets [`HttpCheckError::Canceled`]
//! immediately. The detached task is not aborted; it may still finish
//! against the store afterwards, and its outcome is dropped.
//!
//! ```rust
//! use std::time::Duration;
//! use httpcheck::execution::{run_detached, OperationContext};
//!
//! # tokio_test::block_on(async {
//! let ctx = OperationContext::with_timeout(Duration::from_millis(50));
//! let answer = run_detached("answer", &ctx, async { Ok(42) }).await;
//! assert_eq!(answer, Ok(42));
//!
//! let slow = run_detached("slow", &ctx, async {
//!     tokio::time::sleep(Duration::from_secs(1)).await;
//!     Ok(())
//! })
//! .await;
//! assert!(slow.unwrap_err().is_canceled());
//! # });
//! ```

use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::{HttpCheckError, Result};

/// Deadline shared by every step of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationContext {
    deadline: Instant,
}

impl OperationContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self { deadline }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// Drive `future` in place until it completes or the deadline passes.
    ///
    /// The future is dropped on expiry, so this suits calls that are
    /// cancel-safe by construction (HTTP requests to the orchestration API).
    pub async fn bounded<T, F>(&self, operation: &str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_expired() {
            return Err(HttpCheckError::canceled(operation));
        }

        match tokio::time::timeout_at(self.deadline, future).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(operation = %operation, "Deadline elapsed before operation completed");
                Err(HttpCheckError::canceled(operation))
            }
        }
    }
}

/// Run `work` as a detached task and wait for its outcome or the deadline,
/// whichever comes first.
///
/// An already-expired context short-circuits without starting the work.
pub async fn run_detached<T, F>(operation: &'static str, ctx: &OperationContext, work: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    if ctx.is_expired() {
        return Err(HttpCheckError::canceled(operation));
    }

    let (outcome_tx, outcome_rx) = oneshot::channel();

    tokio::spawn(async move {
        let outcome = work.await;
        if outcome_tx.send(outcome).is_err() {
            debug!(
                operation = operation,
                "Caller abandoned operation; discarding late outcome"
            );
        }
    });

    tokio::select! {
        biased;
        outcome = outcome_rx => match outcome {
            Ok(result) => result,
            Err(_) => Err(HttpCheckError::Database(format!(
                "{operation} terminated without reporting an outcome"
            ))),
        },
        _ = tokio::time::sleep_until(ctx.deadline()) => {
            warn!(operation = operation, "Deadline elapsed; abandoning store call");
            Err(HttpCheckError::canceled(operation))
        }
    }
}
