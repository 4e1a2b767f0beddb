use std::collections::BTreeMap;

use reqwest::{
    Method,
    header::{HeaderName, HeaderValue},
};
use url::Url;

use crate::endpoints::Endpoint;

/// Longest accepted interval between round starts (24 hours)
const MAX_INTERVAL_SECS: u64 = 86_400;

/// Validation results with specific error messages
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self { is_valid: true, error: None }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self { is_valid: false, error: Some(msg.into()) }
    }

    /// Chain another check, keeping the first failure
    pub fn and_then(self, next: impl FnOnce() -> ValidationResult) -> ValidationResult {
        if self.is_valid { next() } else { self }
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.error.unwrap_or_else(|| "Validation failed".to_string()))
        }
    }
}

/// Validate a whole endpoint descriptor, reporting the first problem found
pub fn validate_endpoint(endpoint: &Endpoint) -> ValidationResult {
    validate_endpoint_name(&endpoint.name)
        .and_then(|| validate_http_endpoint(&endpoint.url))
        .and_then(|| validate_method(&endpoint.method))
        .and_then(|| validate_headers(&endpoint.headers))
        .and_then(|| validate_json_body(&endpoint.body))
}

/// Validate endpoint name
pub fn validate_endpoint_name(name: &str) -> ValidationResult {
    if name.trim().is_empty() {
        return ValidationResult::err("name missing");
    }

    ValidationResult::ok()
}

/// Validate HTTP/HTTPS URL endpoint
pub fn validate_http_endpoint(target: &str) -> ValidationResult {
    if target.trim().is_empty() {
        return ValidationResult::err("url missing");
    }

    match Url::parse(target) {
        Ok(url) => {
            let scheme = url.scheme();
            if scheme != "http" && scheme != "https" {
                return ValidationResult::err(format!(
                    "Invalid scheme '{scheme}'. Must be http or https"
                ));
            }

            if url.host_str().is_none() {
                return ValidationResult::err("URL must have a valid host");
            }

            ValidationResult::ok()
        }
        Err(e) => {
            if !target.contains("://") {
                ValidationResult::err("URL must include scheme (http:// or https://)")
            } else {
                ValidationResult::err(format!("Invalid URL: {e}"))
            }
        }
    }
}

/// Validate an (already upper-cased) HTTP method token
pub fn validate_method(method: &str) -> ValidationResult {
    if method.is_empty() {
        return ValidationResult::err("HTTP method cannot be empty");
    }

    match Method::from_bytes(method.as_bytes()) {
        Ok(_) => ValidationResult::ok(),
        Err(_) => ValidationResult::err(format!("Invalid HTTP method '{method}'")),
    }
}

/// Validate that every header name and value can go on the wire
pub fn validate_headers(headers: &BTreeMap<String, String>) -> ValidationResult {
    for (name, value) in headers {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return ValidationResult::err(format!("Invalid header name '{name}'"));
        }
        if HeaderValue::from_str(value).is_err() {
            return ValidationResult::err(format!("Invalid value for header '{name}'"));
        }
    }

    ValidationResult::ok()
}

/// Validate that the request body is a JSON document
pub fn validate_json_body(body: &str) -> ValidationResult {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(_) => ValidationResult::ok(),
        Err(e) => ValidationResult::err(format!("body is not valid JSON: {e}")),
    }
}

/// Validate the round interval
pub fn validate_interval(interval_secs: u64) -> ValidationResult {
    if interval_secs == 0 {
        return ValidationResult::err("Interval must be at least 1 second");
    }

    if interval_secs > MAX_INTERVAL_SECS {
        return ValidationResult::err("Interval too long (max 24 hours)");
    }

    ValidationResult::ok()
}

/// Validate the per-request deadline against the interval
pub fn validate_timeout(timeout_ms: u64, interval_secs: u64) -> ValidationResult {
    if timeout_ms == 0 {
        return ValidationResult::err("Request timeout must be at least 1 millisecond");
    }

    if timeout_ms >= interval_secs.saturating_mul(1000) {
        return ValidationResult::err("Request timeout must be less than interval");
    }

    ValidationResult::ok()
}
