//! Request-scoped cancellation and deadlines.
//!
//! Every store call made by the services goes through [`RequestContext::run`],
//! which races the call against the caller's cancellation token and optional
//! deadline. An aborted call surfaces as
//! `ProgrammeError::StoreFailure(RepositoryError::Cancelled | TimeoutError)`.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::{ProgrammeError, ProgrammeResult};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the context to an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Apply an optional timeout (e.g. from configuration).
    pub fn with_optional_timeout(self, timeout: Option<Duration>) -> Self {
        match timeout {
            Some(timeout) => self.with_timeout(timeout),
            None => self,
        }
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the token is cancelled or the deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// The error for a batch step that failed with `err` while this context
    /// was being cancelled. A failure that is not itself a cancellation is
    /// replaced by the context's own cancellation or timeout.
    pub fn interrupted(&self, operation: &str, err: ProgrammeError) -> ProgrammeError {
        if err.is_cancellation() {
            return err;
        }
        let cause = if self.token.is_cancelled() {
            RepositoryError::cancelled(operation)
        } else if self.deadline.is_some_and(|d| Instant::now() >= d) {
            RepositoryError::timeout(operation)
        } else {
            return err;
        };
        cause.into()
    }

    /// Await a store call unless the context is cancelled or expires first.
    pub async fn run<T, F>(&self, operation: &str, call: F) -> ProgrammeResult<T>
    where
        F: Future<Output = RepositoryResult<T>>,
    {
        let result = match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(RepositoryError::cancelled(operation)),
                    _ = tokio::time::sleep_until(deadline) => Err(RepositoryError::timeout(operation)),
                    res = call => res,
                }
            }
            None => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Err(RepositoryError::cancelled(operation)),
                    res = call => res,
                }
            }
        };

        result.map_err(|e| e.with_context(ErrorContext::new(operation)).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ProgrammeError;

    #[tokio::test]
    async fn test_interrupted_replaces_late_lookup_failure() {
        let ctx = RequestContext::new();
        ctx.cancel();
        let err = ctx.interrupted("generate_heatmap", ProgrammeError::NotFound("a".into()));
        assert!(matches!(
            err,
            ProgrammeError::StoreFailure(RepositoryError::Cancelled { .. })
        ));

        let ctx = RequestContext::new().with_timeout(Duration::ZERO);
        let missing = crate::models::StreamerId::new("a");
        let err = ctx.interrupted(
            "generate_heatmap",
            ProgrammeError::insufficient_data(&missing),
        );
        match err {
            ProgrammeError::StoreFailure(RepositoryError::TimeoutError { context, .. }) => {
                assert_eq!(context.operation.as_deref(), Some("generate_heatmap"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_interrupted_keeps_original_errors() {
        let live = RequestContext::new();
        let err = live.interrupted("follower_count", ProgrammeError::NotFound("a".into()));
        assert!(matches!(err, ProgrammeError::NotFound(_)));

        let ctx = RequestContext::new().with_timeout(Duration::ZERO);
        ctx.cancel();
        let err = ctx.interrupted(
            "follower_count",
            RepositoryError::timeout("follower_count").into(),
        );
        assert!(matches!(
            err,
            ProgrammeError::StoreFailure(RepositoryError::TimeoutError { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_passes_through_result() {
        let ctx = RequestContext::new();
        let value = ctx.run("noop", async { Ok::<_, RepositoryError>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_context_aborts_call() {
        let ctx = RequestContext::new();
        ctx.cancel();

        let err = ctx
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, RepositoryError>(())
            })
            .await
            .unwrap_err();

        assert!(err.is_cancellation());
        match err {
            ProgrammeError::StoreFailure(RepositoryError::Cancelled { context, .. }) => {
                assert_eq!(context.operation.as_deref(), Some("slow"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_times_out() {
        let ctx = RequestContext::new().with_timeout(Duration::from_millis(50));

        let err = ctx
            .run("slow", async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, RepositoryError>(())
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProgrammeError::StoreFailure(RepositoryError::TimeoutError { .. })
        ));
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_not_found_maps_through() {
        let ctx = RequestContext::new();
        let err = ctx
            .run("get_streamer", async {
                Err::<(), _>(RepositoryError::not_found("Streamer x not found"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProgrammeError::NotFound(_)));
    }
}
