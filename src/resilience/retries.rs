//! The readiness wait loop.
//!
//! # Responsibilities
//! - Check the full alias set once per attempt
//! - Retry retryable failures with the policy's backoff
//! - Stop on success, a non-retryable error, exhaustion or cancellation
//!
//! # Design Decisions
//! - `Ok(false)` from a check counts as a retryable "not ready yet"
//! - No sleep after the final permitted attempt

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::health::check::AvailabilityCheck;
use crate::health::types::{display_set, Alias, ProbeError};
use crate::observability::metrics;
use crate::resilience::backoff::RetryPolicy;

/// A successful wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitOutcome {
    /// Number of checks made, including the successful one.
    pub attempts: u32,
    /// Time from the first check to success.
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Error)]
pub enum WaitError {
    #[error("no databases requested")]
    NoTargets,

    #[error("database not available after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: ProbeError,
    },

    #[error("database check failed on attempt {attempts}: {source}")]
    Fatal {
        attempts: u32,
        #[source]
        source: ProbeError,
    },

    #[error("wait cancelled after {attempts} attempts")]
    Cancelled { attempts: u32 },
}

impl WaitError {
    pub fn attempts(&self) -> u32 {
        match self {
            WaitError::NoTargets => 0,
            WaitError::Exhausted { attempts, .. }
            | WaitError::Fatal { attempts, .. }
            | WaitError::Cancelled { attempts } => *attempts,
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            WaitError::Exhausted { .. } => 1,
            WaitError::NoTargets | WaitError::Fatal { .. } => 2,
            WaitError::Cancelled { .. } => 130,
        }
    }
}

/// Block until every alias in `targets` answers `check`.
pub async fn wait_for_db<C>(
    check: &C,
    targets: &[Alias],
    policy: &RetryPolicy,
) -> Result<WaitOutcome, WaitError>
where
    C: AvailabilityCheck,
{
    wait_for_db_until(check, targets, policy, std::future::pending()).await
}

/// Like [`wait_for_db`], but gives up with [`WaitError::Cancelled`] as soon
/// as `cancel` resolves.
pub async fn wait_for_db_until<C, F>(
    check: &C,
    targets: &[Alias],
    policy: &RetryPolicy,
    cancel: F,
) -> Result<WaitOutcome, WaitError>
where
    C: AvailabilityCheck,
    F: Future<Output = ()>,
{
    if targets.is_empty() {
        return Err(WaitError::NoTargets);
    }

    let databases = display_set(targets);
    let started = Instant::now();
    let mut attempts = 0u32;
    tokio::pin!(cancel);

    tracing::info!(
        databases = %databases,
        max_attempts = ?policy.max_attempts,
        "Waiting for database"
    );

    loop {
        attempts += 1;

        let result = tokio::select! {
            biased;
            _ = &mut cancel => return Err(cancelled(attempts - 1, started)),
            result = check.check(targets) => result,
        };

        let failure = match result {
            Ok(true) => {
                let elapsed = started.elapsed();
                metrics::record_attempt("success");
                metrics::record_wait(elapsed, "success");
                tracing::info!(
                    databases = %databases,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Database available"
                );
                return Ok(WaitOutcome { attempts, elapsed });
            }
            Ok(false) => ProbeError::operational(databases.clone(), "check reported not ready"),
            Err(e) if e.retryable() => e,
            Err(e) => {
                metrics::record_attempt("fatal");
                metrics::record_wait(started.elapsed(), "fatal");
                tracing::error!(
                    alias = %e.alias,
                    kind = %e.kind,
                    attempts,
                    error = %e.message,
                    "Database check failed with a non-retryable error"
                );
                return Err(WaitError::Fatal {
                    attempts,
                    source: e,
                });
            }
        };

        metrics::record_attempt("retryable");

        if !policy.allows(attempts) {
            metrics::record_wait(started.elapsed(), "exhausted");
            tracing::error!(
                databases = %databases,
                attempts,
                error = %failure,
                "Database still unavailable, giving up"
            );
            return Err(WaitError::Exhausted {
                attempts,
                last: failure,
            });
        }

        let delay = policy.backoff.delay(attempts);
        tracing::warn!(
            alias = %failure.alias,
            kind = %failure.kind,
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %failure.message,
            "Database unavailable, retrying"
        );

        tokio::select! {
            biased;
            _ = &mut cancel => return Err(cancelled(attempts, started)),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

fn cancelled(attempts: u32, started: Instant) -> WaitError {
    metrics::record_wait(started.elapsed(), "cancelled");
    tracing::warn!(attempts, "Wait for database cancelled");
    WaitError::Cancelled { attempts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::types::ProbeErrorKind;
    use crate::resilience::backoff::Backoff;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with `kind` for the first `failures` calls, then succeeds.
    struct FlakyCheck {
        failures: u32,
        kind: ProbeErrorKind,
        calls: AtomicU32,
    }

    impl FlakyCheck {
        fn new(failures: u32, kind: ProbeErrorKind) -> Self {
            Self {
                failures,
                kind,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl AvailabilityCheck for FlakyCheck {
        async fn check(&self, _databases: &[Alias]) -> Result<bool, ProbeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(ProbeError::new("default", self.kind, "not yet"))
            } else {
                Ok(true)
            }
        }
    }

    fn policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy::new(max_attempts, Backoff::fixed(Duration::from_millis(100)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausts_attempt_ceiling() {
        let check = FlakyCheck::new(10, ProbeErrorKind::Connection);
        let err = wait_for_db(&check, &[Alias::default()], &policy(Some(3)))
            .await
            .unwrap_err();

        match &err {
            WaitError::Exhausted { attempts, last } => {
                assert_eq!(*attempts, 3);
                assert_eq!(last.kind, ProbeErrorKind::Connection);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
        assert_eq!(err.exit_code(), 1);
        assert_eq!(check.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sleep_after_last_attempt() {
        let check = FlakyCheck::new(10, ProbeErrorKind::Operational);
        let started = Instant::now();
        let _ = wait_for_db(&check, &[Alias::default()], &policy(Some(3))).await;
        assert_eq!(started.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_last_permitted_attempt() {
        let check = FlakyCheck::new(2, ProbeErrorKind::Connection);
        let outcome = wait_for_db(&check, &[Alias::default()], &policy(Some(3)))
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test]
    async fn test_rejects_empty_target_set() {
        let check = FlakyCheck::new(0, ProbeErrorKind::Connection);
        let err = wait_for_db(&check, &[], &policy(None)).await.unwrap_err();
        assert!(matches!(err, WaitError::NoTargets));
        assert_eq!(check.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let check = FlakyCheck::new(u32::MAX, ProbeErrorKind::Connection);
        let policy = RetryPolicy::new(None, Backoff::fixed(Duration::from_secs(10)));
        let cancel = tokio::time::sleep(Duration::from_secs(25));

        let err = wait_for_db_until(&check, &[Alias::default()], &policy, cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::Cancelled { attempts: 3 }));
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_error_messages() {
        let err = WaitError::Exhausted {
            attempts: 4,
            last: ProbeError::connection("default", "refused"),
        };
        assert_eq!(
            err.to_string(),
            "database not available after 4 attempts: connection error on database 'default': refused"
        );
        assert_eq!(err.attempts(), 4);
    }
}
