//! Endpoint descriptors and the YAML file they are loaded from.
//!
//! The file is a top-level sequence of mappings:
//!
//! ```yaml
//! - name: fetch index page
//!   url: https://example.com/
//!   method: GET
//!   headers:
//!     user-agent: uppe-monitor
//!   body: '{}'
//! ```
//!
//! Every entry is validated before monitoring starts; one bad entry rejects
//! the whole file.

use std::{collections::BTreeMap, fs, path::Path};

use reqwest::{
    Method,
    header::{HeaderMap, HeaderName, HeaderValue},
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::validate_endpoint;

fn default_method() -> String {
    "GET".to_string()
}

fn default_body() -> String {
    "{}".to_string()
}

/// One configured probe target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub url: String,

    /// Upper-cased once loaded
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// JSON document sent as the request body
    #[serde(default = "default_body")]
    pub body: String,
}

impl Endpoint {
    /// Decode the configured body into the JSON payload that is sent.
    pub fn json_body(&self) -> Result<serde_json::Value, ConfigError> {
        serde_json::from_str(&self.body)
            .map_err(|source| ConfigError::InvalidBody { endpoint: self.name.clone(), source })
    }

    pub fn http_method(&self) -> Result<Method, ConfigError> {
        Method::from_bytes(self.method.to_uppercase().as_bytes()).map_err(|_| {
            ConfigError::InvalidMethod { endpoint: self.name.clone(), method: self.method.clone() }
        })
    }

    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let invalid =
                || ConfigError::InvalidHeader { endpoint: self.name.clone(), header: name.clone() };
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            map.insert(name, value);
        }

        Ok(map)
    }

    fn normalized(mut self) -> Self {
        self.method = self.method.trim().to_uppercase();
        self
    }
}

#[cfg(test)]
impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            body: default_body(),
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }
}

/// Read and validate the endpoint file at `path`.
pub fn load_endpoints(path: impl AsRef<Path>) -> Result<Vec<Endpoint>, ConfigError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

    parse_endpoints(&raw)
}

/// Parse and validate endpoint descriptors from YAML text.
pub fn parse_endpoints(raw: &str) -> Result<Vec<Endpoint>, ConfigError> {
    let endpoints: Vec<Endpoint> = serde_yaml::from_str(raw)?;

    if endpoints.is_empty() {
        return Err(ConfigError::NoEndpoints);
    }

    endpoints
        .into_iter()
        .enumerate()
        .map(|(index, endpoint)| {
            let endpoint = endpoint.normalized();
            validate_endpoint(&endpoint)
                .into_result()
                .map(|()| endpoint)
                .map_err(|reason| ConfigError::InvalidEndpoint { index, reason })
        })
        .collect()
}
