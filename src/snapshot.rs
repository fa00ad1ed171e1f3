//! The library snapshot document.
//!
//! A snapshot is a point-in-time JSON export of the whole library: every
//! crate with its tracks. The snapshotter writes it, the proposal generator
//! reads it; nothing ever edits one in place. The document carries an
//! explicit `schema_version` so that drift between the jobs surfaces at
//! load time instead of as missing-field surprises mid-run.

use crate::serato::SeratoLibrary;
use crate::track::LibraryTrack;
use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current snapshot document schema.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// One crate and its tracks as exported from the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotCrate {
    pub name: String,
    pub tracks: Vec<LibraryTrack>,
}

/// A point-in-time export of the full library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    pub crates: Vec<SnapshotCrate>,
}

impl Snapshot {
    pub fn new(crates: Vec<SnapshotCrate>) -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            crates,
        }
    }

    /// Total track entries across all crates (a track in two crates counts
    /// twice, mirroring how the index sees the snapshot).
    pub fn track_count(&self) -> usize {
        self.crates.iter().map(|c| c.tracks.len()).sum()
    }

    /// Write the snapshot as pretty-printed JSON, overwriting any previous
    /// file. Whole-file overwrite is the only write mode; re-running the
    /// snapshotter is the recovery path for a torn write.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize library snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        Ok(())
    }

    /// Load and schema-check a snapshot document.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
        let snapshot: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Snapshot at {} is not valid JSON", path.display()))?;
        if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
            bail!(
                "Snapshot at {} has schema version {} but this build expects {}; re-run `cratesmith snapshot`",
                path.display(),
                snapshot.schema_version,
                SNAPSHOT_SCHEMA_VERSION
            );
        }
        Ok(snapshot)
    }
}

/// Run the snapshotter job: read every crate from the Serato library under
/// `library_root` and write the snapshot document to `out_path`.
pub fn run(library_root: &Path, out_path: &Path) -> Result<()> {
    println!("Reading Serato library under {}...", library_root.display());

    let library = SeratoLibrary::open(library_root)?;
    let crates = library.read_all_crates()?;
    let snapshot = Snapshot::new(crates);

    info!(
        "Snapshotted {} crates / {} track entries",
        snapshot.crates.len(),
        snapshot.track_count()
    );

    snapshot.save(out_path)?;
    println!(
        "Saved library snapshot ({} crates, {} tracks) to {}",
        snapshot.crates.len(),
        snapshot.track_count(),
        out_path.display()
    );
    Ok(())
}
