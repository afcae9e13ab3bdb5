use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use std::time::{Duration, Instant};

/// A one-shot delay that fires once after `duration`.
///
/// Emits a single [`Instant`] when the delay elapses, then completes. The
/// `key` is part of the subscription identity: declaring an `After` with a
/// new key starts a fresh timer and cancels the one with the old key.
///
/// # Example
///
/// ```rust,ignore
/// use std::time::Duration;
/// use checkcombo_core::{subscribe, After};
///
/// let sub = subscribe(After::new(Duration::from_millis(400), generation))
///     .map(move |_| Msg::GuardElapsed(generation));
/// ```
pub struct After {
    /// How long to wait before firing.
    pub duration: Duration,
    /// Distinguishes successive timers of the same kind.
    pub key: u64,
}

impl After {
    /// Create a new one-shot delay.
    pub fn new(duration: Duration, key: u64) -> Self {
        Self { duration, key }
    }
}

impl SubscriptionSource for After {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.key)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let stream = futures::stream::once(async move {
            tokio::time::sleep(self.duration).await;
            Instant::now()
        });
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[test]
    fn key_is_part_of_identity() {
        let a = After::new(Duration::from_millis(10), 1);
        let b = After::new(Duration::from_millis(10), 2);
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn fires_once() {
        let mut stream = After::new(Duration::from_millis(5), 7).stream();
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
    }
}
