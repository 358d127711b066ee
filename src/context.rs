use tokio_util::sync::CancellationToken;

use crate::error::{FestwrapError, Result};

/// Per-request values threaded through every repository call.
///
/// Clones share the same cancellation token, so cancelling the context a
/// request started with also cancels every lookup spawned from it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    access_token: String,
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            cancellation: CancellationToken::new(),
        }
    }

    /// Bearer token for the streaming service.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Drives `future` unless the context gets cancelled first. A future
    /// failing because of the cancellation is reported as cancelled too.
    pub async fn run_until_cancelled<T>(
        &self,
        future: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(FestwrapError::Cancelled),
            result = future => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use tokio_test::{assert_pending, assert_ready, task};

    use super::*;

    #[test]
    fn test_cancel_reaches_clones() {
        let ctx = RequestContext::new("some_token");
        let clone = ctx.clone();
        let mut cancelled = task::spawn(clone.cancellation().cancelled());

        assert_pending!(cancelled.poll());
        ctx.cancel();

        assert!(cancelled.is_woken());
        assert_ready!(cancelled.poll());
        assert_eq!(clone.access_token(), "some_token");
    }

    #[test]
    fn test_default_context_is_not_cancelled() {
        let ctx = RequestContext::default();

        assert!(!ctx.cancellation().is_cancelled());
        assert_eq!(ctx.access_token(), "");
    }

    #[tokio::test]
    async fn test_run_until_cancelled_returns_result() {
        let ctx = RequestContext::new("some_token");

        let result = ctx.run_until_cancelled(async { Ok(5) }).await;

        assert_eq!(result.unwrap(), 5);
    }

    #[test]
    fn test_run_until_cancelled_stops_pending_future() {
        let ctx = RequestContext::new("some_token");
        let mut run = task::spawn(ctx.run_until_cancelled(pending::<Result<()>>()));

        assert_pending!(run.poll());
        ctx.cancel();

        assert!(matches!(
            assert_ready!(run.poll()),
            Err(FestwrapError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_run_until_cancelled_reports_cancellation_over_inner_error() {
        let ctx = RequestContext::new("some_token");
        ctx.cancel();

        let result = ctx
            .run_until_cancelled(async {
                Err::<(), _>(FestwrapError::NoSongsResolved {
                    artist: "Movements".into(),
                    attempted: 3,
                })
            })
            .await;

        assert!(matches!(result, Err(FestwrapError::Cancelled)));
    }
}
