//! Cratesmith reconciles a DJ's play history with their Serato library and
//! forges rule-based crate proposals.
//!
//! Three batch jobs share JSON documents on disk, and data flows strictly
//! one way: library -> snapshot -> proposal -> approved crates.
//!
//! Core modules:
//! - [`index`] - normalized-title lookup over a snapshot
//! - [`matching`] - best-match selection for ambiguous titles
//! - [`rules`] - the named rule catalog and its thresholds
//! - [`proposal`] - the rule engine and proposal document
//!
//! ### Supporting Modules
//!
//! - [`snapshot`] - the library snapshot document and snapshotter job
//! - [`approve`] - materializing approved crates
//! - [`history`] - play-history CSV reading
//! - [`serato`] - thin wrapper over Serato's on-disk library
//! - [`config`] - runtime paths and defaults
//! - [`cli`] - command-line definitions with clap integration
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use cratesmith::{proposal, rules, snapshot};
//! use std::path::Path;
//!
//! // Load a snapshot and reconcile a history export against it
//! let snap = snapshot::Snapshot::load(Path::new("library_snapshot.json"))?;
//! let history = cratesmith::history::read_history(Path::new("history.csv"))?;
//!
//! let generated = proposal::generate(
//!     &snap,
//!     &history,
//!     &rules::catalog(),
//!     &rules::RuleThresholds::default(),
//! );
//! println!("{} crates proposed", generated.proposed_crates.len());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Fallible functions return `anyhow::Result`. Malformed numeric fields
//! (BPM, energy) are never errors - they degrade to fallback behavior.
//! Per-crate approval failures are logged and skipped. Everything else
//! propagates to `main` and terminates the run with a non-zero exit code.

pub mod approve;
pub mod cli;
pub mod config;
pub mod history;
pub mod index;
pub mod matching;
pub mod proposal;
pub mod rules;
pub mod serato;
pub mod snapshot;
pub mod track;
