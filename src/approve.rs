//! The approval job: materialize operator-approved crates.
//!
//! Approval is deliberately forgiving. Ids that don't appear in the
//! proposal are ignored, a crate with no tracks is skipped with a warning,
//! and a failure to create one crate is logged and does not stop the rest
//! of the batch - the operator re-runs for whatever didn't land.

use crate::proposal::{Proposal, ProposedCrate};
use crate::serato::LibraryWriter;
use anyhow::Result;
use log::{error, warn};
use std::collections::HashSet;

/// Create one playlist per approved crate in the target library.
///
/// Returns the number of crates actually created.
pub fn run<L: LibraryWriter>(
    proposal: &Proposal,
    approved_ids: &[String],
    library: &mut L,
) -> usize {
    let approved: HashSet<&str> = approved_ids.iter().map(String::as_str).collect();

    let mut created = 0;
    for crate_data in &proposal.proposed_crates {
        if !approved.contains(crate_data.id.as_str()) {
            continue;
        }
        println!("Approving and creating crate: \"{}\"", crate_data.name);

        if crate_data.tracks.is_empty() {
            warn!(
                "Crate '{}' has no tracks in the proposal; skipping",
                crate_data.id
            );
            continue;
        }

        match create_crate(crate_data, library) {
            Ok(()) => {
                created += 1;
                println!(
                    "  Created crate \"{}\" with {} tracks",
                    crate_data.name,
                    crate_data.tracks.len()
                );
            }
            // Per-crate failure: log and keep going.
            Err(err) => error!("Failed to create crate '{}': {err:#}", crate_data.name),
        }
    }
    created
}

fn create_crate<L: LibraryWriter>(crate_data: &ProposedCrate, library: &mut L) -> Result<()> {
    let mut playlist = library.create_playlist(&crate_data.name)?;
    for track in &crate_data.tracks {
        if !track.file_path.is_empty() {
            library.add_track(&mut playlist, &track.file_path);
        }
    }
    library.persist(playlist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposal::{ProposedTrack, PROPOSAL_SCHEMA_VERSION};
    use anyhow::anyhow;

    /// Records what the approver asked for instead of touching a library.
    #[derive(Default)]
    struct FakeLibrary {
        persisted: Vec<(String, Vec<String>)>,
        fail_on: Option<String>,
    }

    impl LibraryWriter for FakeLibrary {
        type Playlist = (String, Vec<String>);

        fn create_playlist(&mut self, name: &str) -> Result<Self::Playlist> {
            if self.fail_on.as_deref() == Some(name) {
                return Err(anyhow!("library rejected '{name}'"));
            }
            Ok((name.to_string(), Vec::new()))
        }

        fn add_track(&mut self, playlist: &mut Self::Playlist, file_path: &str) {
            playlist.1.push(file_path.to_string());
        }

        fn persist(&mut self, playlist: Self::Playlist) -> Result<()> {
            self.persisted.push(playlist);
            Ok(())
        }
    }

    fn crate_with(id: &str, name: &str, paths: &[&str]) -> ProposedCrate {
        ProposedCrate {
            id: id.to_string(),
            name: name.to_string(),
            track_count: paths.len(),
            tracks: paths
                .iter()
                .map(|path| ProposedTrack {
                    artist: String::new(),
                    title: String::new(),
                    genre: String::new(),
                    bpm: None,
                    file_path: path.to_string(),
                })
                .collect(),
        }
    }

    fn proposal_with(crates: Vec<ProposedCrate>) -> Proposal {
        Proposal {
            schema_version: PROPOSAL_SCHEMA_VERSION,
            proposal_id: "prop_test".to_string(),
            proposed_crates: crates,
        }
    }

    #[test]
    fn creates_only_approved_crates() {
        let proposal = proposal_with(vec![
            crate_with("closing_time_mix", "AI - Closing Time Mix", &["/a.mp3"]),
            crate_with("hip_hop_and_rb", "AI - Hip-Hop & R&B", &["/b.mp3"]),
        ]);
        let mut library = FakeLibrary::default();

        let created = run(&proposal, &["closing_time_mix".to_string()], &mut library);

        assert_eq!(created, 1);
        assert_eq!(library.persisted.len(), 1);
        assert_eq!(library.persisted[0].0, "AI - Closing Time Mix");
        assert_eq!(library.persisted[0].1, vec!["/a.mp3"]);
    }

    #[test]
    fn unknown_ids_create_nothing_and_do_not_error() {
        let proposal =
            proposal_with(vec![crate_with("closing_time_mix", "Closing", &["/a.mp3"])]);
        let mut library = FakeLibrary::default();

        let created = run(&proposal, &["no_such_crate".to_string()], &mut library);

        assert_eq!(created, 0);
        assert!(library.persisted.is_empty());
    }

    #[test]
    fn empty_crates_are_skipped_not_created() {
        let proposal = proposal_with(vec![crate_with("empty_mix", "Empty Mix", &[])]);
        let mut library = FakeLibrary::default();

        let created = run(&proposal, &["empty_mix".to_string()], &mut library);

        assert_eq!(created, 0);
        assert!(library.persisted.is_empty());
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let proposal = proposal_with(vec![
            crate_with("first", "Doomed Crate", &["/a.mp3"]),
            crate_with("second", "Fine Crate", &["/b.mp3"]),
        ]);
        let mut library = FakeLibrary {
            fail_on: Some("Doomed Crate".to_string()),
            ..FakeLibrary::default()
        };

        let created = run(
            &proposal,
            &["first".to_string(), "second".to_string()],
            &mut library,
        );

        assert_eq!(created, 1);
        assert_eq!(library.persisted.len(), 1);
        assert_eq!(library.persisted[0].0, "Fine Crate");
    }

    #[test]
    fn blank_file_paths_are_not_added() {
        let proposal = proposal_with(vec![crate_with("mix", "Mix", &["/a.mp3", "", "/b.mp3"])]);
        let mut library = FakeLibrary::default();

        run(&proposal, &["mix".to_string()], &mut library);

        assert_eq!(library.persisted[0].1, vec!["/a.mp3", "/b.mp3"]);
    }
}
