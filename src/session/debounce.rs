//! Keystroke debouncing with invalidation tokens.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Proof of having scheduled a debounced action.
///
/// Only the most recently issued token of a `Debouncer` is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceToken(u64);

/// Coalesces bursts of events into a single action after a quiet period.
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Issue a new token, invalidating every earlier one.
    pub fn schedule(&self) -> DebounceToken {
        DebounceToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidate all outstanding tokens without issuing a new one.
    pub fn cancel(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: DebounceToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Wait out the quiet period; true if `token` is still current afterwards.
    pub async fn settle(&self, token: DebounceToken) -> bool {
        tokio::time::sleep(self.quiet).await;
        self.is_current(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_invalidates_older() {
        let debouncer = Debouncer::new(Duration::from_millis(600));
        let first = debouncer.schedule();
        assert!(debouncer.is_current(first));

        let second = debouncer.schedule();
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));

        debouncer.cancel();
        assert!(!debouncer.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn settle_reports_superseded_tokens() {
        let debouncer = Debouncer::new(Duration::from_millis(600));
        let first = debouncer.schedule();

        let waiter = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.settle(first).await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = debouncer.schedule();

        assert!(!waiter.await.unwrap());
        assert!(debouncer.settle(second).await);
    }
}
