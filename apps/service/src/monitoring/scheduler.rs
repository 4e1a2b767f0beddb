use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::aggregator::Aggregator;
use super::executor::RoundExecutor;
use crate::endpoints::Endpoint;
use crate::error::ConfigError;

/// Default time between the starts of two consecutive rounds
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15);

/// Time left to wait before the next round, given how long this one took.
///
/// Never negative: an overrunning round is followed immediately by the next.
pub fn next_sleep(interval: Duration, elapsed: Duration) -> Duration {
    interval.saturating_sub(elapsed)
}

/// Monitoring scheduler - runs rounds back to back at a fixed cadence
pub struct MonitoringScheduler {
    executor: RoundExecutor,
    interval: Duration,
}

impl MonitoringScheduler {
    pub fn new(executor: RoundExecutor, interval: Duration) -> Self {
        Self { executor, interval }
    }

    /// Probe `endpoints` round after round until `shutdown` resolves.
    ///
    /// Each finished round is aggregated as a whole and the cumulative
    /// availability of every domain is logged. A round still in flight when
    /// `shutdown` fires is dropped without touching the counters. Returns the
    /// counters accumulated up to that point.
    pub async fn run<F>(
        &self,
        endpoints: &[Endpoint],
        shutdown: F,
    ) -> Result<Aggregator, ConfigError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut aggregator = Aggregator::new();
        let mut round: u64 = 0;

        loop {
            let round_start = Instant::now();
            round += 1;

            let results = tokio::select! {
                biased;
                () = &mut shutdown => {
                    debug!(round, "Abandoning in-flight round");
                    break;
                }
                results = self.executor.run_round(endpoints) => results?,
            };

            aggregator.record_round(&results);
            for line in aggregator.report() {
                info!("{line}");
            }
            info!("---");

            let pause = next_sleep(self.interval, round_start.elapsed());
            debug!(round, sleep_ms = pause.as_millis() as u64, "Round complete");

            tokio::select! {
                biased;
                () = &mut shutdown => break,
                () = sleep(pause) => {}
            }
        }

        Ok(aggregator)
    }
}
