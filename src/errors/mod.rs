//! Centralized error handling for m3u-merge
//!
//! Errors are split by the layer that raises them:
//!
//! - **Source Errors**: a single playlist source could not be fetched. These
//!   are recovered by the fetcher and only logged.
//! - **Splice Errors**: the target file does not contain a usable marker
//!   region. These abort the run before anything is written.
//! - **Application Errors**: everything surfaced to `main`.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for Source Results
pub type SourceResult<T> = Result<T, SourceError>;
