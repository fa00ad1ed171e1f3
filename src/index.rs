//! Title index over a library snapshot.
//!
//! Matching works on normalized titles: lowercased and trimmed. A title can
//! map to several library tracks (same song in multiple crates, re-edits
//! tagged with the same name), so each bucket keeps every occurrence in
//! encounter order - the order is what makes tie-breaking deterministic.

use crate::snapshot::Snapshot;
use crate::track::LibraryTrack;
use log::info;
use std::collections::HashMap;

/// Normalize a title for lookup: lowercase, surrounding whitespace removed.
pub fn normalize_title(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Lookup from normalized title to the library tracks carrying it.
#[derive(Debug)]
pub struct TitleIndex<'a> {
    buckets: HashMap<String, Vec<&'a LibraryTrack>>,
}

impl<'a> TitleIndex<'a> {
    /// Build the index from a snapshot. Tracks without a title are skipped;
    /// they are unreachable by title matching. An empty snapshot yields an
    /// empty index.
    pub fn build(snapshot: &'a Snapshot) -> Self {
        let mut buckets: HashMap<String, Vec<&'a LibraryTrack>> = HashMap::new();
        for crate_entry in &snapshot.crates {
            for track in &crate_entry.tracks {
                if track.title.trim().is_empty() {
                    continue;
                }
                buckets
                    .entry(normalize_title(&track.title))
                    .or_default()
                    .push(track);
            }
        }
        info!("Built title index with {} unique track titles", buckets.len());
        Self { buckets }
    }

    /// Candidates sharing the given title, in encounter order.
    pub fn lookup(&self, title: &str) -> Option<&[&'a LibraryTrack]> {
        self.buckets
            .get(&normalize_title(title))
            .map(Vec::as_slice)
    }

    /// Number of distinct normalized titles.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotCrate;

    fn track(title: &str, path: &str) -> LibraryTrack {
        LibraryTrack {
            artist: String::new(),
            title: title.to_string(),
            genre: String::new(),
            bpm: None,
            comment: String::new(),
            file_path: path.to_string(),
        }
    }

    fn snapshot(tracks: Vec<LibraryTrack>) -> Snapshot {
        Snapshot::new(vec![SnapshotCrate {
            name: "Test Crate".to_string(),
            tracks,
        }])
    }

    #[test]
    fn empty_snapshot_yields_empty_index() {
        let snap = Snapshot::new(Vec::new());
        let index = TitleIndex::build(&snap);
        assert!(index.is_empty());
        assert!(index.lookup("anything").is_none());
    }

    #[test]
    fn lookup_is_case_and_whitespace_insensitive() {
        let snap = snapshot(vec![track("  Song A ", "/a.mp3")]);
        let index = TitleIndex::build(&snap);
        assert_eq!(index.len(), 1);
        let hits = index.lookup("song a").unwrap();
        assert_eq!(hits[0].file_path, "/a.mp3");
        assert!(index.lookup("SONG A").is_some());
    }

    #[test]
    fn untitled_tracks_are_not_indexed() {
        let snap = snapshot(vec![track("", "/a.mp3"), track("   ", "/b.mp3")]);
        let index = TitleIndex::build(&snap);
        assert!(index.is_empty());
    }

    #[test]
    fn duplicate_titles_share_a_bucket_in_order() {
        let snap = snapshot(vec![
            track("Song A", "/first.mp3"),
            track("song a", "/second.mp3"),
        ]);
        let index = TitleIndex::build(&snap);
        let hits = index.lookup("Song A").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].file_path, "/first.mp3");
        assert_eq!(hits[1].file_path, "/second.mp3");
    }
}
