//! Bounded exponential backoff for upstream calls whose failures say
//! whether they are worth repeating.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// A failure that knows whether an identical request might succeed later
pub trait Transient {
    fn is_transient(&self) -> bool;
}

/// Attempt budget and delay schedule.
///
/// The delay before retry `n` (1-based) is `first_delay * 2^(n-1)`, capped at
/// `max_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    /// Total attempts, first one included; 0 behaves like 1
    pub attempts: u32,
    pub first_delay: Duration,
    pub max_delay: Duration,
}

impl Backoff {
    /// Catalog forests: 3 attempts, waiting 1s then 2s
    pub const CATALOG: Backoff = Backoff {
        attempts: 3,
        first_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(5),
    };

    fn delay_before_retry(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry.saturating_sub(1)).unwrap_or(u32::MAX);
        self.first_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// Run `call` until it succeeds, fails permanently or the budget runs out.
///
/// Returns the last failure unchanged. `target` names what is being fetched
/// in log lines.
pub async fn retry_transient<T, E, F, Fut>(backoff: Backoff, target: &str, mut call: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Transient + Display,
{
    let attempts = backoff.attempts.max(1);
    let mut retry = 0;

    loop {
        match call().await {
            Ok(value) => {
                if retry > 0 {
                    debug!("{} recovered after {} retries", target, retry);
                }
                return Ok(value);
            }
            Err(failure) if failure.is_transient() && retry + 1 < attempts => {
                retry += 1;
                let delay = backoff.delay_before_retry(retry);
                warn!(
                    "{} failed ({}), retry {}/{} in {:?}",
                    target,
                    failure,
                    retry,
                    attempts - 1,
                    delay
                );
                sleep(delay).await;
            }
            Err(failure) => {
                if failure.is_transient() {
                    warn!("{} failed after {} attempts: {}", target, retry + 1, failure);
                } else {
                    debug!("{} failed permanently: {}", target, failure);
                }
                return Err(failure);
            }
        }
    }
}
