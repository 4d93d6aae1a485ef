//! Per-request context: cancellation, deadline and metadata values.
//!
//! Every [`Request`](crate::Request) carries a `Context`. The chain never looks
//! at it; senders and callbacks that wait on something are expected to honour
//! cancellation and the deadline.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

/// Metadata key-value pairs attached to a request context.
pub type Values = HashMap<String, String>;

/// Cancellation, deadline and value context carried by a request.
///
/// Clones share cancellation state: cancelling any clone cancels them all.
/// Deadline and values are copied.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
    values: Values,
}

impl Context {
    /// Creates a context with no deadline, no values and a fresh cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Adds a metadata value.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Uses an existing cancellation token, e.g. one shared by a batch of requests.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Derives a context that is cancelled when this one is, but whose own
    /// cancellation does not propagate back up.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
            deadline: self.deadline,
            values: self.values.clone(),
        }
    }

    /// Cancels this context and every clone and child of it.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Completes when the context is cancelled.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }

    /// The underlying cancellation token.
    #[must_use]
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// The absolute deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the deadline.
    /// Returns `None` if no deadline is set or it has already passed.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .and_then(|d| d.checked_duration_since(Instant::now()))
    }

    /// Returns `true` if the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Looks up a metadata value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// All metadata values.
    #[must_use]
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Inserts or replaces a metadata value.
    pub fn set_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_defaults() {
        let ctx = Context::new();
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_cancelled());
        assert!(!ctx.is_expired());
        assert!(ctx.values().is_empty());
    }

    #[test]
    fn test_context_with_timeout() {
        let ctx = Context::new().with_timeout(Duration::from_secs(10));
        assert!(ctx.deadline().is_some());
        assert!(!ctx.is_expired());
        assert!(ctx.remaining().unwrap() <= Duration::from_secs(10));
    }

    #[test]
    fn test_context_expired_deadline() {
        let ctx = Context::new().with_deadline(Instant::now() - Duration::from_secs(1));
        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), None);
    }

    #[test]
    fn test_context_values() {
        let mut ctx = Context::new().with_value("tenant", "acme");
        ctx.set_value("attempt", "1");

        assert_eq!(ctx.value("tenant"), Some("acme"));
        assert_eq!(ctx.value("attempt"), Some("1"));
        assert_eq!(ctx.value("missing"), None);
    }

    #[test]
    fn test_clones_share_cancellation() {
        let ctx = Context::new();
        let clone = ctx.clone();
        clone.cancel();
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_child_cancellation_is_one_way() {
        let parent = Context::new().with_value("inherited", "yes");
        let child = parent.child();
        assert_eq!(child.value("inherited"), Some("yes"));

        child.cancel();
        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());

        let other = parent.child();
        parent.cancel();
        assert!(other.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_completes() {
        let ctx = Context::new();
        let waiter = ctx.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        ctx.cancel();
        handle.await.unwrap();
    }
}
