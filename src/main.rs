use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_merge::{
    config::{Config, SourceConfig},
    sources::HttpPlaylistFetcher,
    utils::UrlUtils,
    Pipeline, RunMode,
};

#[derive(Parser)]
#[command(name = "m3u-merge")]
#[command(version)]
#[command(about = "Merge remote M3U playlists into a marker-delimited region of a local playlist")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "m3u-merge.toml")]
    config: PathBuf,

    /// Target playlist file (overrides config file)
    #[arg(short, long, value_name = "PATH")]
    target: Option<PathBuf>,

    /// Source URL, repeatable (replaces configured sources)
    #[arg(short, long = "source", value_name = "URL")]
    sources: Vec<String>,

    /// Additional channel name to allow from filtered sources, repeatable
    #[arg(short, long = "allow", value_name = "NAME")]
    allow: Vec<String>,

    /// Print the updated playlist instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("m3u_merge={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting m3u-merge v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config.display());

    // Override config with CLI arguments
    if let Some(target) = cli.target {
        config.target.path = target;
    }
    if !cli.sources.is_empty() {
        config.sources = cli.sources.into_iter().map(SourceConfig::new).collect();
    }
    config.filter.allow_list.extend(cli.allow);

    for source in &config.sources {
        info!(
            "Source: {}{}",
            UrlUtils::obfuscate_credentials(&source.url),
            if source.apply_filter { " (filtered)" } else { "" }
        );
    }

    let fetcher = HttpPlaylistFetcher::new(&config.http)?;
    let pipeline = Pipeline::new(config, fetcher)?;

    let mode = if cli.dry_run {
        RunMode::DryRun
    } else {
        RunMode::Write
    };
    let summary = pipeline.run(mode).await?;

    if let Some(matched) = summary.channels_matched {
        info!("Filtered sources contributed {} channels", matched);
    }
    info!(
        "Merged {} of {} sources into {}",
        summary.sources_fetched,
        summary.sources_total,
        summary.report.path.display()
    );

    if mode == RunMode::DryRun {
        print!("{}", summary.report.updated);
    }

    Ok(())
}
