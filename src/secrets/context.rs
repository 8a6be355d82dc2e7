//! Cancellation and deadline carried into a fetch.
//!
//! A [`FetchContext`] is the only way to bound a fetch: the retriever adds no
//! timeout of its own. Cancel the token (or let the deadline pass) and the
//! in-flight `GetSecretValue` call is dropped, surfacing as
//! [`FetchFailure::Canceled`] or [`FetchFailure::DeadlineExceeded`].

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::error::FetchFailure;

#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchContext {
    /// A context that is never canceled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context driven by an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { token, deadline: None }
    }

    /// Bound the context to `timeout` from now. An earlier deadline is kept.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bound the context to `deadline`. An earlier deadline is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing <= deadline => existing,
            _ => deadline,
        });
        self
    }

    /// A context canceled together with this one, but cancelable on its own.
    pub fn child(&self) -> Self {
        Self { token: self.token.child_token(), deadline: self.deadline }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` if it is still live.
    pub fn err(&self) -> Option<FetchFailure> {
        if self.token.is_cancelled() {
            Some(FetchFailure::Canceled)
        } else if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            Some(FetchFailure::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Resolve once the context is canceled or its deadline passes.
    pub async fn done(&self) -> FetchFailure {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                _ = self.token.cancelled() => FetchFailure::Canceled,
                _ = tokio::time::sleep_until(deadline) => FetchFailure::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                FetchFailure::Canceled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        let ctx = FetchContext::background();
        assert!(ctx.err().is_none());
        assert!(ctx.deadline().is_none());
    }

    #[tokio::test]
    async fn test_cancel_resolves_done() {
        let ctx = FetchContext::background();
        ctx.cancel();

        assert_eq!(ctx.err(), Some(FetchFailure::Canceled));
        assert_eq!(ctx.done().await, FetchFailure::Canceled);
    }

    #[tokio::test]
    async fn test_deadline_resolves_done() {
        let ctx = FetchContext::background().with_timeout(Duration::from_millis(10));

        assert_eq!(ctx.done().await, FetchFailure::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(FetchFailure::DeadlineExceeded));
    }

    #[tokio::test]
    async fn test_earlier_deadline_wins() {
        let ctx = FetchContext::background()
            .with_timeout(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(3600));

        let remaining = ctx.deadline().unwrap() - Instant::now();
        assert!(remaining <= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_parent_cancel_reaches_child() {
        let parent = FetchContext::background();
        let child = parent.child();

        parent.cancel();
        assert_eq!(child.err(), Some(FetchFailure::Canceled));

        let sibling = FetchContext::background();
        let grandchild = sibling.child();
        grandchild.cancel();
        assert!(sibling.err().is_none());
    }
}
