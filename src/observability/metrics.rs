//! Readiness metrics.
//!
//! # Metrics
//! - `wait_for_db_attempts_total` (counter): checks made, by outcome
//!   (`success`, `retryable`, `fatal`)
//! - `wait_for_db_wait_seconds` (histogram): total wait, by outcome
//!   (`success`, `fatal`, `exhausted`, `cancelled`)

use std::time::Duration;

pub fn record_attempt(outcome: &'static str) {
    ::metrics::counter!("wait_for_db_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_wait(elapsed: Duration, outcome: &'static str) {
    ::metrics::histogram!("wait_for_db_wait_seconds", "outcome" => outcome)
        .record(elapsed.as_secs_f64());
}
