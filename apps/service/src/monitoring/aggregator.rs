use std::collections::HashMap;
use std::fmt;

use super::types::ProbeResult;

/// Cumulative probe counters for one domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DomainStats {
    pub up: u64,
    pub total: u64,
}

impl DomainStats {
    /// Availability as a whole percentage, rounding halves up.
    pub fn availability(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }

        (200 * self.up + self.total) / (2 * self.total)
    }
}

/// One line of the per-round availability report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainAvailability<'a> {
    pub domain: &'a str,
    pub percentage: u64,
}

impl fmt::Display for DomainAvailability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} has {}% availability percentage", self.domain, self.percentage)
    }
}

/// Per-domain availability accumulated over the whole session.
///
/// Counters only grow; domains are reported in the order they were first seen.
#[derive(Debug, Default)]
pub struct Aggregator {
    order: Vec<String>,
    stats: HashMap<String, DomainStats>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a completed round into the counters.
    pub fn record_round(&mut self, results: &[ProbeResult]) {
        for result in results {
            if !self.stats.contains_key(&result.domain) {
                self.order.push(result.domain.clone());
            }
            let stats = self.stats.entry(result.domain.clone()).or_default();

            stats.total += 1;
            if result.is_up() {
                stats.up += 1;
            }
        }
    }

    pub fn stats(&self, domain: &str) -> Option<DomainStats> {
        self.stats.get(domain).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Cumulative availability of every domain seen so far.
    pub fn report(&self) -> impl Iterator<Item = DomainAvailability<'_>> {
        self.order.iter().map(|domain| DomainAvailability {
            domain,
            percentage: self.stats[domain].availability(),
        })
    }
}
