//! Delay between readiness attempts: fixed, or exponential with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::schema::{BackoffKind, RetryConfig};

/// Calculate exponential backoff delay, optionally with jitter.
///
/// `attempt` is the number of failures so far; the first failure waits
/// `base_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64, jitter: bool) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    Duration::from_millis(capped_delay.saturating_add(jitter_ms(capped_delay, jitter)))
}

// 0 to 10% of the delay
fn jitter_ms(delay_ms: u64, enabled: bool) -> u64 {
    let jitter_range = delay_ms / 10;
    if enabled && jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed { delay: Duration, jitter: bool },
    Exponential { base: Duration, max: Duration, jitter: bool },
}

impl Backoff {
    pub fn fixed(delay: Duration) -> Self {
        Backoff::Fixed {
            delay,
            jitter: false,
        }
    }

    /// Delay to sleep after `failures` failed attempts.
    pub fn delay(&self, failures: u32) -> Duration {
        match *self {
            Backoff::Fixed { delay, jitter } => {
                let ms = delay.as_millis() as u64;
                Duration::from_millis(ms.saturating_add(jitter_ms(ms, jitter)))
            }
            Backoff::Exponential { base, max, jitter } => calculate_backoff(
                failures,
                base.as_millis() as u64,
                max.as_millis() as u64,
                jitter,
            ),
        }
    }
}

/// How many times to check and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries until the databases answer.
    pub max_attempts: Option<u32>,
    pub backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: Option<u32>, backoff: Backoff) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Whether another attempt is allowed after `attempts` have been made.
    pub fn allows(&self, attempts: u32) -> bool {
        self.max_attempts.map_or(true, |max| attempts < max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        let base = Duration::from_millis(config.base_delay_ms);
        let backoff = match config.backoff {
            BackoffKind::Fixed => Backoff::Fixed {
                delay: base,
                jitter: config.jitter,
            },
            BackoffKind::Exponential => Backoff::Exponential {
                base,
                max: Duration::from_millis(config.max_delay_ms),
                jitter: config.jitter,
            },
        };
        Self::new(config.max_attempts, backoff)
    }
}
