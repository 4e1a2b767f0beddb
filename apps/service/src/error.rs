use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that prevent monitoring from starting
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Error parsing YAML file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Configuration lists no endpoints")]
    NoEndpoints,
    #[error("Invalid endpoint configuration at position {index}: {reason}")]
    InvalidEndpoint { index: usize, reason: String },
    #[error("Request body of endpoint '{endpoint}' is not valid JSON: {source}")]
    InvalidBody {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Endpoint '{endpoint}' has an invalid HTTP method '{method}'")]
    InvalidMethod { endpoint: String, method: String },
    #[error("Endpoint '{endpoint}' has an invalid header '{header}'")]
    InvalidHeader { endpoint: String, header: String },
    #[error("Invalid settings file {path}: {reason}")]
    Settings { path: PathBuf, reason: String },
}
