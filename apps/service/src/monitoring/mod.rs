/// Monitoring engine module - probes endpoints in rounds
///
/// This module is responsible for:
/// - Probing HTTP/HTTPS endpoints and classifying them UP or DOWN
/// - Fanning a round out over every endpoint and joining it
/// - Accumulating per-domain availability
/// - Pacing rounds on a fixed interval until shutdown
pub mod aggregator;
pub mod checker;
pub mod domain;
pub mod executor;
pub mod scheduler;
pub mod types;

pub use checker::HttpProber;
pub use executor::RoundExecutor;
pub use scheduler::MonitoringScheduler;
