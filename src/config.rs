//! Runtime paths and their defaults.
//!
//! The three jobs share their inputs and outputs through files. Defaults
//! mirror how the workflow is actually run: the interchange documents live
//! in the working directory next to the history export, and the library
//! root is the platform music folder. Every path can be overridden on the
//! command line.

use anyhow::{anyhow, Result};
use std::path::PathBuf;

/// Default snapshot document, written by `snapshot`, read by `propose`.
pub const SNAPSHOT_FILE: &str = "library_snapshot.json";

/// Default proposal document, written by `propose`, read by `approve`.
pub const PROPOSAL_FILE: &str = "ai_crate_proposal.json";

/// Default history CSV export location.
pub const HISTORY_FILE: &str = "history.csv";

/// The platform music folder, where Serato keeps its `_Serato_` directory.
pub fn default_library_root() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join("Music"))
        .ok_or_else(|| anyhow!("Could not determine the home directory; pass --library-root"))
}

/// Optional command-line path overrides, one per configurable location.
#[derive(Debug, Default, Clone)]
pub struct PathOverrides {
    pub library_root: Option<PathBuf>,
    pub snapshot: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub proposal: Option<PathBuf>,
}

/// Fully resolved paths for one run.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub library_root: PathBuf,
    pub snapshot_path: PathBuf,
    pub history_path: PathBuf,
    pub proposal_path: PathBuf,
}

impl RuntimeConfig {
    /// Apply overrides on top of the defaults.
    pub fn resolve(overrides: PathOverrides) -> Result<Self> {
        let library_root = match overrides.library_root {
            Some(root) => root,
            None => default_library_root()?,
        };
        Ok(Self {
            library_root,
            snapshot_path: overrides
                .snapshot
                .unwrap_or_else(|| PathBuf::from(SNAPSHOT_FILE)),
            history_path: overrides
                .history
                .unwrap_or_else(|| PathBuf::from(HISTORY_FILE)),
            proposal_path: overrides
                .proposal
                .unwrap_or_else(|| PathBuf::from(PROPOSAL_FILE)),
        })
    }
}
