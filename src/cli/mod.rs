//! Command-line interface for sirius-sync.
//!
//! Parses the channel/destination arguments and drives the sync
//! pipeline, printing per-track outcomes and a final tally.

mod commands;

pub use commands::{Cli, run_command};
