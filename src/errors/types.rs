//! Error type definitions for m3u-merge

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Source handling errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Target file marker errors
    #[error("Splice error: {0}")]
    Splice(#[from] SpliceError),

    /// Every configured source failed to fetch
    #[error("No content could be fetched from any of the {attempted} configured sources")]
    AllSourcesFailed { attempted: usize },

    /// Sources were fetched but produced nothing to write
    #[error("Fetched sources produced no playlist content")]
    EmptyContent,

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem errors on the target file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while fetching a single playlist source
#[derive(Error, Debug)]
pub enum SourceError {
    /// Non-success HTTP status
    #[error("HTTP error: {status} - URL: {url}")]
    Http { status: u16, url: String },

    /// DNS, connect, TLS or body transfer failure
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// Body could not be decoded as text
    #[error("Failed to decode content from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Errors raised while locating the marker region in the target file
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpliceError {
    #[error("Could not find the start and end markers in the target file")]
    MarkersNotFound,

    #[error("Found {count} marker regions in the target file, expected exactly one")]
    DuplicateMarkers { count: usize },

    #[error("Invalid marker pattern: {message}")]
    Pattern { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Wrap an I/O error with the path it occurred on
    pub fn io<P: Into<String>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl SourceError {
    /// Create an HTTP status error
    pub fn http<U: Into<String>>(status: u16, url: U) -> Self {
        Self::Http {
            status,
            url: url.into(),
        }
    }

    /// Create a transport error
    pub fn transport<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Decode {
            url: url.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sources_failed_message() {
        let err = AppError::AllSourcesFailed { attempted: 3 };
        assert_eq!(
            err.to_string(),
            "No content could be fetched from any of the 3 configured sources"
        );
    }

    #[test]
    fn test_splice_error_converts_to_app_error() {
        let err: AppError = SpliceError::DuplicateMarkers { count: 2 }.into();
        assert!(matches!(
            err,
            AppError::Splice(SpliceError::DuplicateMarkers { count: 2 })
        ));
    }

    #[test]
    fn test_source_error_display() {
        let err = SourceError::http(404, "https://example.com/a.m3u");
        assert_eq!(err.to_string(), "HTTP error: 404 - URL: https://example.com/a.m3u");
    }
}
