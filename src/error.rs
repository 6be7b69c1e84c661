use std::io;

use thiserror::Error;

/// Failure of a single request to the revisions API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Request(#[from] reqwest::Error),
    #[error("server responded with {0}")]
    Status(reqwest::StatusCode),
}

/// Errors raised while resolving revisions and rendering a report.
///
/// None of these are recoverable: the caller aborts the report on any of them.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },
    #[error(
        "report type is not recognized (supported types are \"dependencies\" or \"licenses\"): {0}"
    )]
    UnknownReportType(String),
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("could not get licenses from the revisions API for [{}]: {source}", .locators.join(", "))]
    Fetch {
        locators: Vec<String>,
        source: TransportError,
    },
    #[error("could not parse API response for [{}]: {source}", .locators.join(", "))]
    Parse {
        locators: Vec<String>,
        source: serde_json::Error,
    },
    #[error("could not serialize dependencies: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
