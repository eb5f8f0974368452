//! One-shot merge pipeline
//!
//! Fetch → filter (flagged sources only) → combine → clean → splice. Each
//! stage runs to completion before the next starts.

use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::playlist::{clean_links, combine, ChannelFilter};
use crate::sources::{fetch_all, PlaylistFetcher};
use crate::splicer::{SpliceReport, TargetFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Overwrite the target file
    #[default]
    Write,
    /// Compute the result but leave the target file alone
    DryRun,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub sources_total: usize,
    pub sources_fetched: usize,
    /// Channels kept across filtered sources, `None` if none was fetched
    pub channels_matched: Option<usize>,
    pub written: bool,
    pub report: SpliceReport,
}

impl RunSummary {
    pub fn sources_failed(&self) -> usize {
        self.sources_total - self.sources_fetched
    }
}

pub struct Pipeline<F> {
    config: Config,
    fetcher: F,
    filter: ChannelFilter,
    target: TargetFile,
}

impl<F: PlaylistFetcher> Pipeline<F> {
    pub fn new(config: Config, fetcher: F) -> AppResult<Self> {
        config.validate()?;

        let filter = ChannelFilter::new(&config.filter.allow_list);
        if config.has_filtered_sources() && filter.is_empty() {
            warn!("Filtered sources are configured but the allow list is empty");
        }
        let target = TargetFile::from_config(&config.target);

        Ok(Self {
            config,
            fetcher,
            filter,
            target,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub async fn run(&self, mode: RunMode) -> AppResult<RunSummary> {
        let sources = &self.config.sources;
        info!("Merging {} playlist sources", sources.len());

        let fetched = match fetch_all(&self.fetcher, sources).await {
            Ok(fetched) => fetched,
            Err(e) => {
                error!("Aborting update because no content could be fetched from any source");
                return Err(e);
            }
        };
        let sources_fetched = fetched.len();

        let mut channels_matched = None;
        let documents: Vec<(usize, String)> = fetched
            .into_iter()
            .map(|fetched| {
                let content = if fetched.source.apply_filter {
                    let outcome = self.filter.apply(&fetched.content);
                    *channels_matched.get_or_insert(0) += outcome.matched;
                    outcome.document
                } else {
                    fetched.content
                };
                (fetched.index, content)
            })
            .collect();

        let combined = combine(&documents);
        if combined.is_empty() {
            error!("Aborting update because the fetched sources contained no content");
            return Err(AppError::EmptyContent);
        }

        let cleaned = clean_links(&combined);
        info!("Cleaned the combined links");

        let report = match mode {
            RunMode::Write => self.target.update(&cleaned)?,
            RunMode::DryRun => self.target.render(&cleaned)?,
        };
        let written = mode == RunMode::Write && !report.unchanged;

        Ok(RunSummary {
            sources_total: sources.len(),
            sources_fetched,
            channels_matched,
            written,
            report,
        })
    }
}
