//! # Command-Line Interface Module
//!
//! Defines the command-line surface with Clap derive macros. Each of the
//! three batch jobs is a subcommand; they are run sequentially by the
//! operator and communicate only through the JSON documents on disk.
//!
//! ## Commands
//!
//! - `snapshot`: export the Serato library to the snapshot document
//! - `propose`: reconcile the play history against the snapshot and write
//!   a crate proposal
//! - `approve`: materialize approved proposal crates back into Serato
//! - `completion`: generate shell completions
//!
//! ## Examples
//!
//! ```bash
//! cratesmith snapshot
//! cratesmith propose --history history-10-25-25.csv
//! cratesmith approve closing_time_mix open_format_warmup
//! ```

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main application arguments structure.
///
/// Contains only a subcommand; all functionality is accessed through
/// specific commands.
#[derive(Parser)]
#[command(name = "cratesmith")]
#[command(about = "Cratesmith: Serato play-history reconciliation & rule-based crate proposals")]
#[command(version)]
pub struct Args {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of all available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Export the Serato library to a JSON snapshot
    ///
    /// Reads every crate (and its tracks' tag metadata) from the library
    /// under the music folder and writes the snapshot document. Each run
    /// overwrites the previous snapshot.
    Snapshot {
        /// Music folder containing the _Serato_ directory
        ///
        /// Defaults to the platform music folder (e.g. ~/Music).
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        library_root: Option<PathBuf>,

        /// Where to write the snapshot document
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Generate a crate proposal from the play history
    ///
    /// Loads the library snapshot, reads the history CSV export, matches
    /// each play event to its best library track, and applies the rule
    /// catalog. The resulting proposal lists candidate crates for review;
    /// nothing is created in Serato until `approve` is run.
    Propose {
        /// Library snapshot to reconcile against
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        snapshot: Option<PathBuf>,

        /// Play-history CSV export
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        history: Option<PathBuf>,

        /// Where to write the proposal document
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        out: Option<PathBuf>,
    },

    /// Create approved proposal crates in the Serato library
    ///
    /// Takes the crate ids to approve (as listed in the proposal document)
    /// and creates one Serato crate per id. Ids not present in the proposal
    /// are ignored; crates that fail to create are logged and skipped.
    Approve {
        /// Crate ids to approve, e.g. `closing_time_mix open_format_warmup`
        crate_ids: Vec<String>,

        /// Proposal document to read
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        proposal: Option<PathBuf>,

        /// Music folder containing the _Serato_ directory
        #[arg(long, value_hint = clap::ValueHint::DirPath)]
        library_root: Option<PathBuf>,
    },

    /// Generate shell completions
    ///
    /// Usage: cratesmith completion bash > ~/.local/share/bash-completion/completions/cratesmith
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}
