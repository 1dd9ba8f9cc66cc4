//! Error types for the restaurant listing pipeline
//!
//! Transport and validation failures are kept apart so the client can apply
//! a different policy to each: transport failures always degrade to a
//! fallback value, validation failures only do so in lenient mode.

use std::fmt;

use thiserror::Error;

/// Failure to obtain a usable JSON body from the remote service.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    #[error("Response body is not valid JSON: {reason}")]
    InvalidJson { reason: String },

    #[error("No '{field}' found in the response")]
    MissingField { field: &'static str },

    #[error("Cannot build request URL: {reason}")]
    InvalidUrl { reason: String },
}

/// A single schema violation, located by a JSON-ish path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Re-root the issue under a parent path segment (e.g. a list index).
    pub fn nested_under(self, parent: &str) -> Self {
        let path = if self.path.is_empty() {
            parent.to_string()
        } else if self.path.starts_with('[') {
            format!("{}{}", parent, self.path)
        } else {
            format!("{}.{}", parent, self.path)
        };
        Self {
            path,
            message: self.message,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Response shape did not match the API contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{entity} response doesn't match API contract: {}", format_issues(.issues))]
pub struct ValidationError {
    pub entity: &'static str,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(entity: &'static str, issues: Vec<ValidationIssue>) -> Self {
        Self { entity, issues }
    }

    pub fn single(entity: &'static str, issue: ValidationIssue) -> Self {
        Self::new(entity, vec![issue])
    }
}

fn format_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw outcome of one endpoint call, before any fallback is applied.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Startup configuration errors. All of these are fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not defined in the environment variables")]
    Missing { key: &'static str },

    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}
