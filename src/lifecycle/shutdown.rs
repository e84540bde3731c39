//! Shutdown coordination.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Cancellation handle with an optional deadline.
///
/// Clones share state: cancelling any clone wakes every observer. A latched
/// `watch` channel is used so observers that subscribe after cancellation
/// still see it.
#[derive(Clone, Debug)]
pub struct ShutdownContext {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    deadline: Option<Instant>,
    tx: watch::Sender<bool>,
}

impl ShutdownContext {
    /// A context that only ends through [`cancel`](Self::cancel).
    pub fn never() -> Self {
        Self::build(None)
    }

    /// A context that also ends once `window` has elapsed from now.
    pub fn with_timeout(window: Duration) -> Self {
        Self::build(Some(Instant::now() + window))
    }

    fn build(deadline: Option<Instant>) -> Self {
        let (tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner { deadline, tx }),
        }
    }

    /// Cancel the context. Returns `true` only for the call that flipped it.
    pub fn cancel(&self) -> bool {
        let flipped = self.inner.tx.send_if_modified(|cancelled| {
            if *cancelled {
                false
            } else {
                *cancelled = true;
                true
            }
        });
        if flipped {
            tracing::debug!("Shutdown context cancelled");
        }
        flipped
    }

    /// True once cancelled or past the deadline.
    pub fn is_cancelled(&self) -> bool {
        *self.inner.tx.borrow() || self.expired()
    }

    fn expired(&self) -> bool {
        self.inner.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    /// Time left before the deadline, `None` if there is none.
    pub fn remaining(&self) -> Option<Duration> {
        self.inner
            .deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Wait until the context is cancelled or its deadline passes.
    pub async fn cancelled(&self) {
        let mut rx = self.inner.tx.subscribe();
        let signalled = async move {
            // The sender lives in `inner`, so the channel cannot close here.
            let _ = rx.wait_for(|cancelled| *cancelled).await;
        };

        match self.inner.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = signalled => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => signalled.await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_idempotent() {
        let ctx = ShutdownContext::never();
        assert!(!ctx.is_cancelled());
        assert!(ctx.cancel());
        assert!(!ctx.cancel());
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_deadline() {
        let ctx = ShutdownContext::with_timeout(Duration::from_secs(10));
        let remaining = ctx.remaining().unwrap();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining > Duration::from_secs(9));
        assert!(!ctx.is_cancelled());

        assert!(ShutdownContext::never().remaining().is_none());
    }

    #[tokio::test]
    async fn test_never_does_not_expire() {
        let ctx = ShutdownContext::never();
        let waited = tokio::time::timeout(Duration::from_millis(100), ctx.cancelled()).await;
        assert!(waited.is_err());
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let ctx = ShutdownContext::with_timeout(Duration::from_millis(20));
        tokio::time::timeout(Duration::from_secs(1), ctx.cancelled())
            .await
            .expect("deadline should fire");
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_wakes_all_observers() {
        let ctx = ShutdownContext::never();
        let mut waiters = Vec::new();
        for _ in 0..4 {
            let observer = ctx.clone();
            waiters.push(tokio::spawn(async move { observer.cancelled().await }));
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        ctx.cancel();
        ctx.cancel();

        for waiter in waiters {
            tokio::time::timeout(Duration::from_secs(1), waiter)
                .await
                .expect("observer should wake")
                .unwrap();
        }

        // Late observers see the latched state.
        tokio::time::timeout(Duration::from_millis(50), ctx.cancelled())
            .await
            .expect("late observer should not block");
    }
}
