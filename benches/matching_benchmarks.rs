//! # Cratesmith Benchmarks
//!
//! Benchmarks for the reconciliation hot path: index construction over a
//! snapshot, best-match selection over ambiguous candidates, and a full
//! proposal generation pass.
//!
//! ```bash
//! cargo bench
//! cargo bench matching
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use cratesmith::index::TitleIndex;
use cratesmith::matching::best_match;
use cratesmith::proposal;
use cratesmith::rules::{catalog, RuleThresholds};
use cratesmith::snapshot::{Snapshot, SnapshotCrate};
use cratesmith::track::{HistoryTrack, LibraryTrack};

fn synthetic_snapshot(tracks_per_crate: usize, crates: usize) -> Snapshot {
    let genres = ["House", "Techno", "Hip Hop", "Disco", "R&B / Soul"];
    let crates = (0..crates)
        .map(|c| SnapshotCrate {
            name: format!("Crate {c}"),
            tracks: (0..tracks_per_crate)
                .map(|t| LibraryTrack {
                    artist: format!("Artist {}", t % 40),
                    title: format!("Song {}", t % 500),
                    genre: genres[t % genres.len()].to_string(),
                    bpm: Some(80.0 + (t % 80) as f64),
                    comment: format!("{}", t % 10),
                    file_path: format!("/music/crate{c}/song{t}.mp3"),
                })
                .collect(),
        })
        .collect();
    Snapshot::new(crates)
}

fn synthetic_history(events: usize) -> Vec<HistoryTrack> {
    (0..events)
        .map(|i| HistoryTrack {
            title: format!("Song {}", i % 500),
            artist: format!("Artist {}", i % 40),
            genre: if i % 2 == 0 { "House" } else { "Techno" }.to_string(),
            bpm: format!("{}", 90 + (i % 60)),
            started_at: format!("2025-10-25 23:{:02}:00", i % 60),
        })
        .collect()
}

fn bench_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index");
    for size in [100, 1_000, 5_000] {
        let snapshot = synthetic_snapshot(size, 4);
        group.bench_with_input(BenchmarkId::new("build", size), &snapshot, |b, snap| {
            b.iter(|| TitleIndex::build(black_box(snap)));
        });
    }
    group.finish();
}

fn bench_best_match(c: &mut Criterion) {
    let mut group = c.benchmark_group("matching");

    let event = HistoryTrack {
        title: "Song 1".to_string(),
        artist: "Artist".to_string(),
        genre: "House".to_string(),
        bpm: "124".to_string(),
        started_at: String::new(),
    };

    for ambiguity in [2usize, 8, 32] {
        let candidates: Vec<LibraryTrack> = (0..ambiguity)
            .map(|i| LibraryTrack {
                artist: format!("Artist {i}"),
                title: "Song 1".to_string(),
                genre: if i % 3 == 0 { "House" } else { "Techno" }.to_string(),
                bpm: Some(100.0 + i as f64),
                comment: String::new(),
                file_path: format!("/music/song{i}.mp3"),
            })
            .collect();
        let refs: Vec<&LibraryTrack> = candidates.iter().collect();

        group.bench_with_input(
            BenchmarkId::new("best_match", ambiguity),
            &refs,
            |b, candidates| {
                b.iter(|| best_match(black_box(&event), black_box(candidates)));
            },
        );
    }
    group.finish();
}

fn bench_proposal_generation(c: &mut Criterion) {
    let snapshot = synthetic_snapshot(2_000, 4);
    let history = synthetic_history(1_000);
    let rules = catalog();
    let thresholds = RuleThresholds::default();

    c.bench_function("proposal/generate", |b| {
        b.iter(|| {
            proposal::generate(
                black_box(&snapshot),
                black_box(&history),
                black_box(&rules),
                black_box(&thresholds),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_index_build,
    bench_best_match,
    bench_proposal_generation
);
criterion_main!(benches);
