//! Best-match selection between a play event and its title candidates.
//!
//! When a normalized title maps to more than one library track, one track
//! has to stand for the play event. Precision beats recall here: an exact
//! genre match narrows the field before BPM proximity gets a say, and a
//! positional fallback guarantees a result whenever any candidates exist.
//!
//! The selection order:
//!
//! 1. A single candidate wins outright.
//! 2. Candidates whose genre equals the play event's genre form the search
//!    set; when none match, the full candidate list is searched instead.
//! 3. An unparseable history BPM ends the search: first candidate of the
//!    search set wins.
//! 4. Otherwise the candidate with the smallest absolute BPM difference
//!    wins. Candidates without a BPM are skipped, and ties go to the
//!    first-encountered candidate (strict `<`, not `<=`).
//! 5. If nothing had a usable BPM, the first candidate of the search set
//!    wins.

use crate::track::{HistoryTrack, LibraryTrack};
use log::trace;

/// Pick the single library track that best represents a play event.
///
/// `candidates` must all share the event's normalized title; the caller
/// gets them from [`crate::index::TitleIndex::lookup`]. Returns `None`
/// only when `candidates` is empty.
pub fn best_match<'a>(
    history: &HistoryTrack,
    candidates: &[&'a LibraryTrack],
) -> Option<&'a LibraryTrack> {
    if candidates.len() == 1 {
        return Some(candidates[0]);
    }

    let same_genre: Vec<&'a LibraryTrack> = candidates
        .iter()
        .copied()
        .filter(|track| track.genre == history.genre)
        .collect();
    let search: &[&'a LibraryTrack] = if same_genre.is_empty() {
        candidates
    } else {
        &same_genre
    };

    let Some(history_bpm) = history.bpm() else {
        trace!(
            "History BPM {:?} unparseable for '{}', using positional fallback",
            history.bpm,
            history.title
        );
        return search.first().copied();
    };

    let mut best: Option<&'a LibraryTrack> = None;
    let mut smallest_diff = f64::INFINITY;
    for &track in search {
        let Some(bpm) = track.bpm else { continue };
        let diff = (history_bpm - bpm).abs();
        if diff < smallest_diff {
            smallest_diff = diff;
            best = Some(track);
        }
    }

    best.or_else(|| search.first().copied())
}
