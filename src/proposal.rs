//! Proposal generation: the rule engine and its output document.
//!
//! A proposal is one run's worth of candidate crates. For every rule in the
//! catalog, every play event is resolved to its best library match and the
//! rule's predicate decides membership. Tracks dedup by file path (a track
//! played three times contributes once), and rules that matched nothing are
//! omitted rather than emitted empty.
//!
//! Each run overwrites the proposal file; proposals are never merged and go
//! stale the moment the library or history changes. Regeneration is cheap
//! and is the intended refresh mechanism.

use crate::index::TitleIndex;
use crate::matching::best_match;
use crate::rules::{CrateRule, RuleThresholds};
use crate::snapshot::Snapshot;
use crate::track::{HistoryTrack, LibraryTrack};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Current proposal document schema.
pub const PROPOSAL_SCHEMA_VERSION: u32 = 1;

/// A track inside a proposed crate. Carries only the fields the operator
/// needs for review; the comment field stays behind in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedTrack {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub bpm: Option<f64>,
    pub file_path: String,
}

impl From<&LibraryTrack> for ProposedTrack {
    fn from(track: &LibraryTrack) -> Self {
        Self {
            artist: track.artist.clone(),
            title: track.title.clone(),
            genre: track.genre.clone(),
            bpm: track.bpm,
            file_path: track.file_path.clone(),
        }
    }
}

/// One rule's worth of matched tracks, pending operator approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposedCrate {
    pub id: String,
    pub name: String,
    pub track_count: usize,
    pub tracks: Vec<ProposedTrack>,
}

/// The proposal document: everything one generator run suggested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub schema_version: u32,
    pub proposal_id: String,
    pub proposed_crates: Vec<ProposedCrate>,
}

impl Proposal {
    /// Write the proposal as pretty-printed JSON (whole-file overwrite).
    pub fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize proposal")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write proposal to {}", path.display()))?;
        Ok(())
    }

    /// Load and schema-check a proposal document.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read proposal from {}", path.display()))?;
        let proposal: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Proposal at {} is not valid JSON", path.display()))?;
        if proposal.schema_version != PROPOSAL_SCHEMA_VERSION {
            bail!(
                "Proposal at {} has schema version {} but this build expects {}; re-run `cratesmith propose`",
                path.display(),
                proposal.schema_version,
                PROPOSAL_SCHEMA_VERSION
            );
        }
        Ok(proposal)
    }

    pub fn find_crate(&self, id: &str) -> Option<&ProposedCrate> {
        self.proposed_crates.iter().find(|c| c.id == id)
    }
}

/// Run the rule engine over a snapshot and play history.
///
/// Play events whose title is absent from the index contribute nothing.
/// Within a crate, tracks keep first-seen order.
pub fn generate(
    snapshot: &Snapshot,
    history: &[HistoryTrack],
    rules: &[CrateRule],
    thresholds: &RuleThresholds,
) -> Proposal {
    let index = TitleIndex::build(snapshot);
    info!(
        "Generating proposal from {} play events against {} indexed titles",
        history.len(),
        index.len()
    );

    let mut proposed_crates = Vec::new();
    for rule in rules {
        let mut seen = HashSet::new();
        let mut tracks = Vec::new();

        for event in history {
            let Some(candidates) = index.lookup(&event.title) else {
                continue;
            };
            let Some(matched) = best_match(event, candidates) else {
                continue;
            };
            if rule.matches(matched, event, thresholds)
                && seen.insert(matched.file_path.clone())
            {
                tracks.push(ProposedTrack::from(matched));
            }
        }

        if tracks.is_empty() {
            debug!("Rule '{}' matched no tracks; omitting", rule.id);
            continue;
        }
        info!("Rule '{}' matched {} tracks", rule.id, tracks.len());
        proposed_crates.push(ProposedCrate {
            id: rule.id.to_string(),
            name: rule.name.to_string(),
            track_count: tracks.len(),
            tracks,
        });
    }

    Proposal {
        schema_version: PROPOSAL_SCHEMA_VERSION,
        proposal_id: format!("prop_{}", Utc::now().timestamp_millis()),
        proposed_crates,
    }
}

/// Run the proposal generator job end to end: load the snapshot, read the
/// history log, apply the stock catalog, and write the proposal document.
pub fn run(snapshot_path: &Path, history_path: &Path, out_path: &Path) -> Result<()> {
    println!("Generating crate proposal...");

    let snapshot = Snapshot::load(snapshot_path)?;
    let history = crate::history::read_history(history_path)?;

    let proposal = generate(
        &snapshot,
        &history,
        &crate::rules::catalog(),
        &RuleThresholds::default(),
    );

    for crate_data in &proposal.proposed_crates {
        println!(
            "  Proposed crate \"{}\" with {} tracks",
            crate_data.name, crate_data.track_count
        );
    }
    if proposal.proposed_crates.is_empty() {
        println!("  No rule matched any played track; proposal is empty");
    }

    proposal.save(out_path)?;
    println!(
        "Proposal {} written to {}. Review it, then run `cratesmith approve <crate-id>...`",
        proposal.proposal_id,
        out_path.display()
    );
    Ok(())
}
