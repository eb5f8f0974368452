//! HTTP playlist fetching

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info, warn};

use super::traits::PlaylistFetcher;
use crate::config::{HttpConfig, SourceConfig};
use crate::errors::{AppError, AppResult, SourceError, SourceResult};
use crate::utils::UrlUtils;

/// Playlist fetcher backed by `reqwest`
///
/// No request timeout is set, so a stalled source blocks until the
/// transport gives up.
pub struct HttpPlaylistFetcher {
    client: Client,
}

impl HttpPlaylistFetcher {
    pub fn new(config: &HttpConfig) -> AppResult<Self> {
        let mut builder = Client::builder();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let client = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PlaylistFetcher for HttpPlaylistFetcher {
    async fn fetch_text(&self, url: &str) -> SourceResult<String> {
        let safe_url = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching playlist from: {}", safe_url);

        let response = self.client.get(url).send().await.map_err(|e| {
            SourceError::transport(&safe_url, UrlUtils::obfuscate_credentials(&e.to_string()))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(status.as_u16(), safe_url));
        }

        let content = response
            .text()
            .await
            .map_err(|e| SourceError::decode(&safe_url, e.to_string()))?;

        debug!("Fetched {} bytes from {}", content.len(), safe_url);
        Ok(content)
    }
}

/// Body of a source that was fetched successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSource {
    /// Position of the source in the configured list
    pub index: usize,
    pub source: SourceConfig,
    pub content: String,
}

/// Fetch every source in order, skipping the ones that fail.
///
/// Returns `AppError::AllSourcesFailed` when no source could be fetched.
pub async fn fetch_all<F>(fetcher: &F, sources: &[SourceConfig]) -> AppResult<Vec<FetchedSource>>
where
    F: PlaylistFetcher + ?Sized,
{
    let mut fetched = Vec::with_capacity(sources.len());

    for (index, source) in sources.iter().enumerate() {
        let safe_url = UrlUtils::obfuscate_credentials(&source.url);
        match fetcher.fetch_text(&source.url).await {
            Ok(content) => {
                info!("Successfully fetched content from {}", safe_url);
                fetched.push(FetchedSource {
                    index,
                    source: source.clone(),
                    content,
                });
            }
            Err(e) => {
                error!("Error fetching content from {}: {}", safe_url, e);
            }
        }
    }

    if fetched.is_empty() {
        return Err(AppError::AllSourcesFailed {
            attempted: sources.len(),
        });
    }

    let failed = sources.len() - fetched.len();
    if failed > 0 {
        warn!(
            "{} of {} sources failed, continuing with the remaining {}",
            failed,
            sources.len(),
            fetched.len()
        );
    }

    Ok(fetched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticFetcher {
        bodies: HashMap<String, String>,
    }

    #[async_trait]
    impl PlaylistFetcher for StaticFetcher {
        async fn fetch_text(&self, url: &str) -> SourceResult<String> {
            self.bodies
                .get(url)
                .cloned()
                .ok_or_else(|| SourceError::http(404, url))
        }
    }

    fn fetcher(entries: &[(&str, &str)]) -> StaticFetcher {
        StaticFetcher {
            bodies: entries
                .iter()
                .map(|(url, body)| (url.to_string(), body.to_string()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_fetch_all_skips_failures_in_order() {
        let fetcher = fetcher(&[("https://a", "A"), ("https://c", "C")]);
        let sources = vec![
            SourceConfig::new("https://a"),
            SourceConfig::new("https://b"),
            SourceConfig::filtered("https://c"),
        ];

        let fetched = fetch_all(&fetcher, &sources).await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].content, "A");
        assert_eq!(fetched[1].content, "C");
        assert_eq!((fetched[0].index, fetched[1].index), (0, 2));
        assert!(fetched[1].source.apply_filter);
    }

    #[tokio::test]
    async fn test_fetch_all_fails_when_nothing_fetched() {
        let fetcher = fetcher(&[]);
        let sources = vec![SourceConfig::new("https://a"), SourceConfig::new("https://b")];

        let err = fetch_all(&fetcher, &sources).await.unwrap_err();
        assert!(matches!(err, AppError::AllSourcesFailed { attempted: 2 }));
    }

    #[test]
    fn test_fetch_all_single_source() {
        let fetcher = fetcher(&[("https://only", "#EXTM3U")]);
        let sources = vec![SourceConfig::new("https://only")];

        let fetched = tokio_test::block_on(fetch_all(&fetcher, &sources)).unwrap();
        assert_eq!(fetched, vec![FetchedSource {
            index: 0,
            source: SourceConfig::new("https://only"),
            content: "#EXTM3U".to_string(),
        }]);
    }

    #[test]
    fn test_http_fetcher_builds_with_user_agent() {
        let config = HttpConfig {
            user_agent: Some("m3u-merge/0.1".to_string()),
        };
        assert!(HttpPlaylistFetcher::new(&config).is_ok());
    }
}
