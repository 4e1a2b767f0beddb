use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "UP"),
            ProbeStatus::Down => write!(f, "DOWN"),
        }
    }
}

/// Why a probe was classified DOWN
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownReason {
    /// A response arrived, but after the deadline
    ResponseTimeExceeded,
    /// A response arrived in time with a non-2xx status
    StatusCode(u16),
    /// The deadline fired before the response was complete
    Timeout,
    /// DNS, connect, TLS or protocol failure
    Connection(String),
}

impl fmt::Display for DownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownReason::ResponseTimeExceeded => write!(f, "timeout exceeded"),
            DownReason::StatusCode(code) => write!(f, "status code: {code}"),
            DownReason::Timeout => write!(f, "timeout"),
            DownReason::Connection(detail) => write!(f, "connection error: {detail}"),
        }
    }
}

/// Result of probing one endpoint once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Name of the endpoint that was probed
    pub endpoint: String,

    /// Host the result is aggregated under
    pub domain: String,

    pub status: ProbeStatus,

    /// Response time in milliseconds, when a response arrived
    pub latency_ms: Option<u64>,

    /// HTTP status code, when a response arrived
    pub status_code: Option<u16>,

    /// Set only when `status` is DOWN
    pub reason: Option<DownReason>,
}

impl ProbeResult {
    /// Start a result for `endpoint`; it stays DOWN until marked UP.
    pub fn new(endpoint: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            domain: domain.into(),
            status: ProbeStatus::Down,
            latency_ms: None,
            status_code: None,
            reason: None,
        }
    }

    /// Record the response that was received
    pub fn with_response(mut self, latency_ms: u64, status_code: u16) -> Self {
        self.latency_ms = Some(latency_ms);
        self.status_code = Some(status_code);
        self
    }

    pub fn up(mut self) -> Self {
        self.status = ProbeStatus::Up;
        self.reason = None;
        self
    }

    pub fn down(mut self, reason: DownReason) -> Self {
        self.status = ProbeStatus::Down;
        self.reason = Some(reason);
        self
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_read_like_log_text() {
        assert_eq!(DownReason::ResponseTimeExceeded.to_string(), "timeout exceeded");
        assert_eq!(DownReason::StatusCode(404).to_string(), "status code: 404");
        assert_eq!(DownReason::Timeout.to_string(), "timeout");
        assert!(
            DownReason::Connection("refused".into()).to_string().starts_with("connection error")
        );
    }

    #[test]
    fn reason_only_on_down() {
        let up = ProbeResult::new("api", "example.com").with_response(12, 200).up();
        assert!(up.is_up());
        assert_eq!(up.reason, None);
        assert_eq!(up.latency_ms, Some(12));

        let down = ProbeResult::new("api", "example.com").down(DownReason::Timeout);
        assert!(!down.is_up());
        assert_eq!(down.reason, Some(DownReason::Timeout));
        assert_eq!(down.status_code, None);
    }
}
