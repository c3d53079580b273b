//! Bounded polling
//!
//! Waits for external state to converge by re-reading it at a fixed
//! interval. Running out of attempts is reported, not raised: the caller
//! decides whether the last observation is good enough.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::HarnessResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

/// Result of a bounded poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The acceptance predicate held on attempt `attempts`
    Converged { value: T, attempts: u32 },
    /// Every attempt was used; `last` is the latest observation, if any
    Exhausted { last: Option<T>, attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn converged(&self) -> bool {
        matches!(self, PollOutcome::Converged { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Converged { attempts, .. } | PollOutcome::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Best available observation regardless of convergence
    pub fn into_value(self) -> Option<T> {
        match self {
            PollOutcome::Converged { value, .. } => Some(value),
            PollOutcome::Exhausted { last, .. } => last,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Total time the policy may spend waiting
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }

    /// Sleep, read, and stop at the first accepted observation
    ///
    /// `last` always holds the latest read, so a read returning `None`
    /// clears an earlier observation. Read errors abort the poll.
    pub async fn poll<T, F, Fut, P>(&self, mut read: F, accept: P) -> HarnessResult<PollOutcome<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = HarnessResult<Option<T>>>,
        P: Fn(&T) -> bool,
    {
        let mut last = None;

        for attempt in 1..=self.max_attempts {
            sleep(self.interval).await;

            last = read(attempt).await?;
            if let Some(observed) = last.take_if(|observed| accept(observed)) {
                return Ok(PollOutcome::Converged {
                    value: observed,
                    attempts: attempt,
                });
            }
        }

        Ok(PollOutcome::Exhausted {
            last,
            attempts: self.max_attempts,
        })
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(20, Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;

    fn immediate(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_converges_on_first_accepted_value() {
        let outcome = immediate(20)
            .poll(|attempt| async move { Ok(Some(attempt)) }, |value| *value >= 7)
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Converged { value: 7, attempts: 7 });
    }

    #[tokio::test]
    async fn test_exhaustion_keeps_last_observation() {
        let outcome = immediate(3)
            .poll(|attempt| async move { Ok(Some(attempt)) }, |_| false)
            .await
            .unwrap();

        assert!(!outcome.converged());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(outcome.into_value(), Some(3));
    }

    #[tokio::test]
    async fn test_absent_read_replaces_earlier_observation() {
        let outcome = immediate(4)
            .poll(
                |attempt| async move { Ok(if attempt == 2 { Some(attempt) } else { None }) },
                |_| false,
            )
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { last: None, attempts: 4 });
    }

    #[tokio::test]
    async fn test_last_read_wins_when_present() {
        let outcome = immediate(3)
            .poll(
                |attempt| async move { Ok(if attempt == 1 { None } else { Some(attempt) }) },
                |_| false,
            )
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { last: Some(3), attempts: 3 });
    }

    #[tokio::test]
    async fn test_nothing_observed() {
        let outcome = immediate(2)
            .poll(|_| async { Ok(None::<u32>) }, |_| true)
            .await
            .unwrap();

        assert_eq!(outcome, PollOutcome::Exhausted { last: None, attempts: 2 });
    }

    #[tokio::test]
    async fn test_read_error_aborts() {
        let mut calls = 0;
        let result = immediate(5)
            .poll(
                |_| {
                    calls += 1;
                    async {
                        Err::<Option<u32>, _>(HarnessError::MetadataQuery {
                            command: "get".to_string(),
                            stderr: "boom".to_string(),
                        })
                    }
                },
                |_| true,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_budget() {
        assert_eq!(RetryPolicy::default().budget(), Duration::from_secs(20));
    }
}
