//! # Cratesmith - Serato crate automation
//!
//! Cratesmith reconciles a play-history export with a snapshot of a Serato
//! library, proposes thematic crates with a fixed rule catalog, and
//! materializes approved proposals back into Serato. The three jobs run
//! sequentially as subcommands and hand data to each other through JSON
//! documents in the working directory.
//!
//! ## Usage
//!
//! ```bash
//! # Export the library to library_snapshot.json
//! cratesmith snapshot
//!
//! # Reconcile a history export and write ai_crate_proposal.json
//! cratesmith propose --history history-10-25-25.csv
//!
//! # Create the approved crates in Serato
//! cratesmith approve closing_time_mix open_format_warmup
//! ```
//!
//! Missing input files are reported and end the run gracefully; anything
//! unexpected propagates, is printed, and exits with code 1. Logging is
//! controlled via `RUST_LOG` (e.g. `RUST_LOG=debug cratesmith propose`).

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cratesmith::config::{PathOverrides, RuntimeConfig};
use cratesmith::proposal::Proposal;
use cratesmith::serato::SeratoLibrary;
use cratesmith::{approve, cli, proposal, snapshot};
use log::info;
use std::path::Path;

/// Report a missing input and the command that produces it. Used for the
/// expected between-jobs gaps, which end the run without an error code.
fn report_missing(what: &str, path: &Path, hint: &str) {
    eprintln!("Error: {what} not found at {}", path.display());
    eprintln!("{hint}");
}

fn main() -> Result<()> {
    // Environment logger for diagnostics, controlled via RUST_LOG
    env_logger::init();

    let args = cli::Args::parse();

    match args.command {
        cli::Command::Snapshot { library_root, out } => {
            let config = RuntimeConfig::resolve(PathOverrides {
                library_root,
                snapshot: out,
                ..PathOverrides::default()
            })?;
            if !config.library_root.is_dir() {
                report_missing(
                    "music folder",
                    &config.library_root,
                    "Pass --library-root pointing at the folder that contains _Serato_.",
                );
                return Ok(());
            }
            info!("Snapshotting library at {}", config.library_root.display());
            snapshot::run(&config.library_root, &config.snapshot_path)?;
        }

        cli::Command::Propose { snapshot, history, out } => {
            let config = RuntimeConfig::resolve(PathOverrides {
                snapshot,
                history,
                proposal: out,
                ..PathOverrides::default()
            })?;
            if !config.snapshot_path.is_file() {
                report_missing(
                    "library snapshot",
                    &config.snapshot_path,
                    "Run `cratesmith snapshot` first.",
                );
                return Ok(());
            }
            if !config.history_path.is_file() {
                report_missing(
                    "history log",
                    &config.history_path,
                    "Pass --history pointing at your play-history CSV export.",
                );
                return Ok(());
            }
            info!(
                "Proposing crates from {} against {}",
                config.history_path.display(),
                config.snapshot_path.display()
            );
            proposal::run(
                &config.snapshot_path,
                &config.history_path,
                &config.proposal_path,
            )?;
        }

        cli::Command::Approve {
            crate_ids,
            proposal,
            library_root,
        } => {
            if crate_ids.is_empty() {
                eprintln!("Error: provide at least one crate id to approve.");
                eprintln!("Example: cratesmith approve closing_time_mix open_format_warmup");
                return Ok(());
            }
            let config = RuntimeConfig::resolve(PathOverrides {
                library_root,
                proposal,
                ..PathOverrides::default()
            })?;
            if !config.proposal_path.is_file() {
                report_missing(
                    "proposal document",
                    &config.proposal_path,
                    "Run `cratesmith propose` first.",
                );
                return Ok(());
            }
            if !config.library_root.is_dir() {
                report_missing(
                    "music folder",
                    &config.library_root,
                    "Pass --library-root pointing at the folder that contains _Serato_.",
                );
                return Ok(());
            }

            println!("Starting crate approval...");
            let document = Proposal::load(&config.proposal_path)?;
            let mut library = SeratoLibrary::open(&config.library_root)?;
            let created = approve::run(&document, &crate_ids, &mut library);
            println!("Crate approval complete: {created} crate(s) created.");
        }

        cli::Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            clap_complete::generate(shell, &mut cmd, "cratesmith", &mut std::io::stdout());
        }
    }

    Ok(())
}
