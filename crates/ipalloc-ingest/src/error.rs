use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("fetch cancelled before {source_name}")]
    Cancelled { source_name: String },

    #[error("failed to parse CSV from {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("no header row with a country code column in {source_name}")]
    MissingHeader { source_name: String },

    #[error("allocation summary is not valid JSON: {0}")]
    SummaryJson(#[from] serde_json::Error),

    #[error("allocation summary must be a JSON object keyed by country code, found {found}")]
    SummaryNotObject { found: String },
}

impl IngestError {
    /// Network errors and server-side failures may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Network { .. } => true,
            IngestError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        let network = IngestError::Network {
            url: "https://example.invalid".to_string(),
            message: "timed out".to_string(),
        };
        assert!(network.is_retryable());
        let server = IngestError::HttpStatus {
            url: "https://example.invalid".to_string(),
            status: 503,
        };
        assert!(server.is_retryable());
        let missing = IngestError::HttpStatus {
            url: "https://example.invalid".to_string(),
            status: 404,
        };
        assert!(!missing.is_retryable());
        let cancelled = IngestError::Cancelled {
            source_name: "apnic".to_string(),
        };
        assert!(!cancelled.is_retryable());
    }
}
