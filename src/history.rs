//! Reading the exported play-history CSV.
//!
//! The history log is an external export; its column set varies between
//! software versions, so the reader trims fields, tolerates extra columns,
//! and skips rows it cannot deserialize rather than failing the run.

use crate::track::HistoryTrack;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

/// Read all play events from a history CSV export.
///
/// Rows that fail to deserialize are logged and skipped; the history is
/// best-effort input, and a handful of bad rows must not abort a run.
pub fn read_history(path: &Path) -> Result<Vec<HistoryTrack>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open history log at {}", path.display()))?;

    let mut tracks = Vec::new();
    for (row, result) in reader.deserialize::<HistoryTrack>().enumerate() {
        match result {
            Ok(track) => tracks.push(track),
            Err(err) => warn!("Skipping malformed history row {}: {err}", row + 2),
        }
    }

    info!("Read {} play events from {}", tracks.len(), path.display());
    Ok(tracks)
}
