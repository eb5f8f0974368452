//! Source handling traits

use async_trait::async_trait;

use crate::errors::SourceResult;

/// Retrieves the raw text body of a playlist source
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> SourceResult<String>;
}
