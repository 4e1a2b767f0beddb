use futures::future::join_all;
use std::sync::Arc;

use super::checker::Prober;
use super::types::ProbeResult;
use crate::endpoints::Endpoint;
use crate::error::ConfigError;

/// Round executor - probes every endpoint once, concurrently
pub struct RoundExecutor {
    prober: Arc<dyn Prober>,
}

impl RoundExecutor {
    pub fn new(prober: Arc<dyn Prober>) -> Self {
        Self { prober }
    }

    /// Run one round.
    ///
    /// All probes are in flight together and every one of them is awaited, so
    /// the round takes as long as its slowest probe. Results come back in
    /// endpoint order. A configuration error from any probe is only reported
    /// once the whole round has finished.
    pub async fn run_round(
        &self,
        endpoints: &[Endpoint],
    ) -> Result<Vec<ProbeResult>, ConfigError> {
        let probes = endpoints.iter().map(|endpoint| self.prober.probe(endpoint));

        join_all(probes).await.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::testing::ScriptedProber;
    use crate::monitoring::types::ProbeStatus;
    use std::time::Duration;
    use tokio::time::Instant;

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("up", "https://up.example.com/"),
            Endpoint::new("down", "https://down.example.com/"),
            Endpoint::new("slow", "https://slow.example.com:8443/"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_round_returns_one_result_per_endpoint_in_order() {
        let prober = ScriptedProber::new()
            .with_delay("up", Duration::from_millis(300))
            .down("down")
            .with_delay("slow", Duration::from_millis(100));
        let executor = RoundExecutor::new(Arc::new(prober));

        let results = executor.run_round(&endpoints()).await.unwrap();

        assert_eq!(results.len(), 3);
        let names: Vec<_> = results.iter().map(|result| result.endpoint.as_str()).collect();
        assert_eq!(names, ["up", "down", "slow"]);
        assert_eq!(results[0].status, ProbeStatus::Up);
        assert_eq!(results[1].status, ProbeStatus::Down);
        assert_eq!(results[2].domain, "slow.example.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_run_concurrently() {
        let prober = ScriptedProber::new()
            .with_delay("up", Duration::from_millis(400))
            .with_delay("down", Duration::from_millis(400))
            .with_delay("slow", Duration::from_millis(450));
        let executor = RoundExecutor::new(Arc::new(prober));

        let start = Instant::now();
        executor.run_round(&endpoints()).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(450));
        assert!(elapsed < Duration::from_millis(800), "probes ran one after another: {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_config_error_does_not_cut_the_round_short() {
        let prober = Arc::new(
            ScriptedProber::new()
                .broken("up")
                .with_delay("slow", Duration::from_millis(200)),
        );
        let executor = RoundExecutor::new(prober.clone());

        let result = executor.run_round(&endpoints()).await;

        assert!(matches!(result, Err(ConfigError::InvalidBody { .. })));
        assert_eq!(prober.completed(), 3);
    }

    #[tokio::test]
    async fn test_empty_round() {
        let executor = RoundExecutor::new(Arc::new(ScriptedProber::new()));

        assert!(executor.run_round(&[]).await.unwrap().is_empty());
    }
}
