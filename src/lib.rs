pub mod config;
pub mod errors;
pub mod pipeline;
pub mod playlist;
pub mod sources;
pub mod splicer;
pub mod utils;

pub use errors::{AppError, AppResult};
pub use pipeline::{Pipeline, RunMode, RunSummary};
