// ABOUTME: Bounded poll-with-interval primitive used by every wait in a deployment.
// ABOUTME: Supports conditions that earn extra attempts by reporting progress.

use std::future::Future;
use std::time::Duration;

/// A condition the poller checks repeatedly.
pub trait Condition {
    type Error;

    /// Returns `Ok(true)` once the condition holds. Errors abort the poll.
    fn check(&mut self) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Extra attempts granted after an unsuccessful check.
    fn extend_budget(&mut self) -> u32 {
        0
    }
}

/// Adapts a closure returning a future into a [`Condition`] without budget extension.
pub struct FnCondition<F>(pub F);

impl<F, Fut, E> Condition for FnCondition<F>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>> + Send,
{
    type Error = E;

    fn check(&mut self) -> impl Future<Output = Result<bool, E>> + Send {
        (self.0)()
    }
}

/// Calls a condition up to `max_tries` times, sleeping `interval` in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Poller {
    pub max_tries: u32,
    pub interval: Duration,
}

impl Poller {
    pub fn new(max_tries: u32, interval: Duration) -> Self {
        Self {
            max_tries,
            interval,
        }
    }

    /// Poll a plain predicate. Returns `Ok(false)` when every attempt failed.
    pub async fn attempt<F, Fut, E>(&self, description: &str, predicate: F) -> Result<bool, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool, E>> + Send,
    {
        self.until(description, &mut FnCondition(predicate)).await
    }

    /// Poll a condition, honouring any budget extensions it grants.
    ///
    /// There is no sleep after a success or after the final attempt.
    pub async fn until<C: Condition>(
        &self,
        description: &str,
        condition: &mut C,
    ) -> Result<bool, C::Error> {
        tracing::debug!(
            max_tries = self.max_tries,
            interval = ?self.interval,
            "waiting for {description}"
        );

        let mut remaining = self.max_tries;
        let mut attempts = 0u32;

        while remaining > 0 {
            remaining -= 1;
            attempts += 1;

            if condition.check().await? {
                tracing::debug!(attempts, "{description}: done");
                return Ok(true);
            }

            let extension = condition.extend_budget();
            if extension > 0 {
                remaining = remaining.saturating_add(extension);
                tracing::debug!(extension, remaining, "{description}: budget extended");
            }

            if remaining > 0 && !self.interval.is_zero() {
                tokio::time::sleep(self.interval).await;
            }
        }

        tracing::warn!(attempts, "gave up waiting for {description}");
        Ok(false)
    }
}
