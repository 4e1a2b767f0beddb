use anyhow::Result;
use std::ops::RangeInclusive;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::domain::extract_domain;
use super::types::{DownReason, ProbeResult, ProbeStatus};
use crate::endpoints::Endpoint;
use crate::error::ConfigError;

/// Default deadline for one request, dispatch to full body
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(500);

const SUCCESS_STATUS_CODES: RangeInclusive<u16> = 200..=299;

/// Probes a single endpoint once
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    /// Probe `endpoint`. Network failures become DOWN results; only a broken
    /// endpoint configuration is returned as an error.
    async fn probe(&self, endpoint: &Endpoint) -> Result<ProbeResult, ConfigError>;
}

/// Classify a received response.
///
/// A late response is reported as such even when its status is also bad.
pub fn classify(
    status_code: u16,
    latency: Duration,
    deadline: Duration,
) -> Result<(), DownReason> {
    if latency > deadline {
        return Err(DownReason::ResponseTimeExceeded);
    }

    if !SUCCESS_STATUS_CODES.contains(&status_code) {
        return Err(DownReason::StatusCode(status_code));
    }

    Ok(())
}

/// HTTP/HTTPS prober sharing one connection pool across probes
pub struct HttpProber {
    client: reqwest::Client,
    deadline: Duration,
}

impl HttpProber {
    pub fn new(deadline: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(deadline)
            .user_agent(concat!("uppe-monitor/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, deadline })
    }

    /// Send the request and read the whole body, returning the status code.
    async fn exchange(&self, request: reqwest::RequestBuilder) -> reqwest::Result<u16> {
        let response = request.send().await?;
        let status_code = response.status().as_u16();
        response.bytes().await?;

        Ok(status_code)
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, endpoint: &Endpoint) -> Result<ProbeResult, ConfigError> {
        let body = endpoint.json_body()?;
        let method = endpoint.http_method()?;
        let headers = endpoint.header_map()?;

        // Configured headers replace the JSON content type when they set one
        let request = self.client.request(method, &endpoint.url).json(&body).headers(headers);

        let result = ProbeResult::new(&endpoint.name, extract_domain(&endpoint.url));

        let start = Instant::now();
        let outcome = self.exchange(request).await;
        let latency = start.elapsed();

        let result = match outcome {
            Ok(status_code) => {
                let result = result.with_response(latency.as_millis() as u64, status_code);
                match classify(status_code, latency, self.deadline) {
                    Ok(()) => result.up(),
                    Err(reason) => result.down(reason),
                }
            }
            Err(e) if e.is_timeout() => result.down(DownReason::Timeout),
            Err(e) => result.down(DownReason::Connection(e.to_string())),
        };

        log_outcome(&result);
        Ok(result)
    }
}

fn log_outcome(result: &ProbeResult) {
    match (&result.status, &result.reason) {
        (ProbeStatus::Up, _) => info!(
            endpoint = %result.endpoint,
            domain = %result.domain,
            status_code = result.status_code,
            latency_ms = result.latency_ms,
            "Endpoint '{}' is UP",
            result.endpoint
        ),
        (ProbeStatus::Down, Some(reason @ DownReason::Connection(_))) => warn!(
            endpoint = %result.endpoint,
            domain = %result.domain,
            "Endpoint '{}' is DOWN ({reason})",
            result.endpoint
        ),
        (ProbeStatus::Down, reason) => info!(
            endpoint = %result.endpoint,
            domain = %result.domain,
            status_code = result.status_code,
            latency_ms = result.latency_ms,
            "Endpoint '{}' is DOWN ({})",
            result.endpoint,
            reason.as_ref().map(ToString::to_string).unwrap_or_default()
        ),
    }
}
