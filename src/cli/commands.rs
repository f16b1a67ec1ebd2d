//! CLI argument definitions and the sync entry point.
//!
//! The binary does one thing, so there are no subcommands: parsed
//! arguments go straight into `run_command`, which builds the runtime
//! and drives the pipeline.

use std::path::{Path, PathBuf};

use clap::Parser;
use tokio::runtime::Runtime;
use tracing::warn;

use crate::config;
use crate::model::{ChannelRequest, OutcomeStatus, PipelineError};
use crate::pipeline::{Orchestrator, PipelineConfig, Tally};
use crate::playlist::{ChannelCache, ChannelSource, PlaylistClient};
use crate::search::SearchClient;

/// Download the most-heard tracks of SiriusXM channels
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Channel slug to sync (repeatable)
    #[arg(short, long = "channel", required_unless_present = "list_channels")]
    pub channel: Vec<String>,

    /// Destination directory for downloaded files
    #[arg(short, long, default_value = ".")]
    pub destination: PathBuf,

    /// Actually download matched tracks (default is a dry run)
    #[arg(long)]
    pub download: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Log file path (default: logs/sirius-sync_<timestamp>.log)
    #[arg(short = 'l', long)]
    pub log_file: Option<PathBuf>,

    /// List known channel slugs and exit
    #[arg(long)]
    pub list_channels: bool,
}

/// Execute the parsed command.
///
/// Per-track and per-channel failures are reported in the output but do
/// not produce a non-zero exit; only setup problems (bad destination,
/// runtime construction) bubble up as errors.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = config::load();

    if cli.list_channels {
        cmd_list_channels(&rt, &config)
    } else {
        cmd_sync(&rt, cli, &config)
    }
}

fn channel_source(config: &config::Config) -> ChannelSource {
    let cache = match &config.cache.dir {
        Some(dir) => ChannelCache::new(dir.clone()),
        None => ChannelCache::default_location(),
    };
    ChannelSource::new(PlaylistClient::new(), cache)
}

fn cmd_list_channels(rt: &Runtime, config: &config::Config) -> anyhow::Result<()> {
    let source = channel_source(config);

    rt.block_on(async {
        let slugs = match source.refresh_stations().await {
            Ok(slugs) => slugs,
            Err(e) => {
                // Fall back to whatever the cache has from a previous run
                warn!(error = %e, "Station refresh failed, using cached list");
                source
                    .known_channels()
                    .ok_or_else(|| anyhow::anyhow!("Could not fetch channel list: {e}"))?
            }
        };

        println!("{} known channels:", slugs.len());
        for slug in slugs {
            println!("  {slug}");
        }
        Ok(())
    })
}

fn cmd_sync(rt: &Runtime, cli: &Cli, config: &config::Config) -> anyhow::Result<()> {
    let requests: Vec<ChannelRequest> = cli
        .channel
        .iter()
        .map(|slug| ChannelRequest::new(slug))
        .collect();

    prepare_destination(&cli.destination)?;

    rt.block_on(async {
        let source = channel_source(config);

        // Best-effort station refresh so ChannelNotFound hints are current
        if let Err(e) = source.refresh_stations().await {
            warn!(error = %e, "Station list refresh failed");
        }
        let known = source.known_channels();

        let search = SearchClient::new();
        let pipeline_config = PipelineConfig {
            min_confidence: config.matching.min_confidence,
            bitrate: config.download.bitrate,
            workers: config.download.effective_workers(),
        };
        let orchestrator = Orchestrator::new(source, search.clone(), search, pipeline_config);

        if !cli.download {
            println!("DRY RUN - resolving matches only, pass --download to fetch files\n");
        }

        let reports = orchestrator.run(&requests, &cli.destination, cli.download).await;

        let mut total = Tally::default();
        for report in &reports {
            println!("Channel: {}", report.channel);

            if let Some(err) = &report.error {
                println!("  ✗ {err}");
                if matches!(err, PipelineError::ChannelNotFound(_)) {
                    if let Some(known) = &known {
                        println!("  Known channels: {}", known.join(", "));
                    }
                }
                continue;
            }

            for outcome in &report.outcomes {
                match outcome.status {
                    OutcomeStatus::Success => {
                        let path = outcome.file_path.as_deref().unwrap_or(Path::new("?"));
                        println!("  ✓ {} -> {}", outcome.track, path.display());
                    }
                    OutcomeStatus::NoMatch => {
                        println!("  ✗ {} ({})", outcome.track, outcome.status.as_str());
                    }
                    OutcomeStatus::DownloadFailed => {
                        let reason = outcome.error.as_deref().unwrap_or("unknown error");
                        println!("  ✗ {} ({reason})", outcome.track);
                    }
                    OutcomeStatus::Skipped => {
                        println!("  - {} ({})", outcome.track, outcome.status.as_str());
                    }
                }
            }

            let tally = report.tally();
            println!("  {tally}");
            total.merge(tally);
        }

        if reports.len() > 1 {
            println!("\nTotal: {total}");
        }
    });

    Ok(())
}

/// Make sure the destination exists, is a directory, and is writable
/// before any workers start writing under it.
fn prepare_destination(destination: &Path) -> anyhow::Result<()> {
    if destination.exists() {
        if !destination.is_dir() {
            anyhow::bail!("Destination {} is not a directory", destination.display());
        }
        // A read-only destination should fail now, not once per track
        let probe = destination.join(".sirius-sync-write-test");
        std::fs::write(&probe, b"").map_err(|e| {
            anyhow::anyhow!("Destination {} is not writable: {e}", destination.display())
        })?;
        let _ = std::fs::remove_file(&probe);
        return Ok(());
    }
    std::fs::create_dir_all(destination)
        .map_err(|e| anyhow::anyhow!("Could not create destination {}: {e}", destination.display()))
}
