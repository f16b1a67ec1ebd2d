//! sirius-sync - downloads the most-heard tracks of SiriusXM channels.
//!
//! Channel listings come from the xmplaylist API, matches are resolved
//! against a music search service, and accepted matches are downloaded
//! as tagged MP3s into a per-channel folder tree.

pub mod cli;
pub mod config;
pub mod fetch;
pub mod model;
pub mod naming;
pub mod pipeline;
pub mod playlist;
pub mod search;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    init_logging(&args)?;

    cli::run_command(&args)
}

/// Initialize logging: terse console output on stderr plus a full log
/// file, at info level (debug with `--debug`, overridable via
/// `RUST_LOG`).
fn init_logging(args: &cli::Cli) -> anyhow::Result<()> {
    let directive = if args.debug {
        "sirius_sync=debug"
    } else {
        "sirius_sync=info"
    };

    let log_path = args.log_file.clone().unwrap_or_else(default_log_path);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let log_file = std::fs::File::create(&log_path)
        .map_err(|e| anyhow::anyhow!("Could not open log file {}: {e}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(Arc::new(log_file)),
        )
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    Ok(())
}

/// Timestamped path under ./logs so successive runs never clobber each
/// other's logs.
fn default_log_path() -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from("logs").join(format!("sirius-sync_{stamp}.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_is_under_logs_dir() {
        let path = default_log_path();
        assert!(path.starts_with("logs"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("sirius-sync_"));
        assert!(name.ends_with(".log"));
    }
}
