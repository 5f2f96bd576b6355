use std::sync::Arc;
use std::time::Duration;

use crate::models::config::ConfigSnapshot;
use crate::models::error::RelayError;
use crate::settings::provider::SettingsProvider;
use crate::traits::clock::Clock;

/// Transient per-call bookkeeping for one guarded operation.
struct RetryState {
    attempt: u32,
    next_delay: Duration,
}

/// Bounded exponential-backoff retry around one fallible operation.
///
/// Parameters come from `[RetrySettings]` of a snapshot; the same policy is
/// applied uniformly at the boundary of every external-tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub backoff_factor: u32,
}

impl RetryPolicy {
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Self {
        Self {
            max_retries: snapshot.retry.max_retries,
            base_delay: Duration::from_secs(snapshot.retry.retry_delay),
            backoff_factor: snapshot.retry.backoff_factor,
        }
    }

    /// Delay before the attempt after `attempt` (1-indexed):
    /// `base_delay * backoff_factor^(attempt - 1)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = self.backoff_factor.saturating_pow(attempt.saturating_sub(1));
        Duration::from_secs(self.base_delay.as_secs().saturating_mul(u64::from(factor)))
    }

    /// Run `operation` until it succeeds or the retry budget is spent.
    ///
    /// Settings are reloaded before every attempt and the fresh snapshot is
    /// handed to the operation, so a config fix applied on disk heals a
    /// failing operation without a process restart. A reload failure counts
    /// as a failed attempt with the config error as its cause. On
    /// exhaustion the last underlying error is wrapped in
    /// [`RelayError::Exhausted`] and returned; it is never swallowed.
    pub fn guard<T, F>(
        &self,
        operation: &str,
        settings: &SettingsProvider,
        clock: &dyn Clock,
        mut op: F,
    ) -> Result<T, RelayError>
    where
        F: FnMut(Arc<ConfigSnapshot>) -> Result<T, RelayError>,
    {
        let mut state = RetryState {
            attempt: 0,
            next_delay: self.base_delay,
        };

        loop {
            state.attempt += 1;
            let outcome = match settings.reload() {
                Ok(snapshot) => op(snapshot),
                Err(e) => Err(e),
            };

            let err = match outcome {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if state.attempt >= self.max_retries {
                log::error!(
                    "{operation}: giving up after attempt {}/{}: {err}",
                    state.attempt,
                    self.max_retries
                );
                return Err(RelayError::Exhausted {
                    operation: operation.to_string(),
                    attempts: state.attempt,
                    cause: Box::new(err),
                });
            }

            state.next_delay = self.delay_after(state.attempt);
            log::warn!(
                "{operation}: attempt {}/{} failed: {err}; retrying in {}s",
                state.attempt,
                self.max_retries,
                state.next_delay.as_secs()
            );
            clock.sleep(state.next_delay);
        }
    }
}
