//! Thin I/O wrapper around Serato's on-disk library.
//!
//! Serato keeps its library inside a `_Serato_` directory next to the music
//! folder: a `database V2` file with one record per known track, and a
//! `Subcrates/` directory with one `.crate` file per crate. Both use the
//! same chunk framing:
//!
//! ```text
//! +--------+----------------+---------+
//! | tag    | length         | payload |
//! | 4 byte | u32 big-endian | N bytes |
//! +--------+----------------+---------+
//! ```
//!
//! Text payloads are UTF-16BE. `otrk` chunks nest further chunks: in the
//! database these are tag fields (`pfil` path, `tsng` title, `tart` artist,
//! `tgen` genre, `tbpm`, `tcom`); in a crate file each `otrk` wraps a single
//! `ptrk` path. Paths are stored relative to the volume root, without the
//! leading slash.
//!
//! This module is deliberately a collaborator, not a catalogue: it reads
//! whole files, tolerates unknown chunks, and writes crate files as whole-
//! file overwrites. The [`LibraryWriter`] trait is the seam the approver
//! works against, so tests can substitute an in-memory library.

use crate::snapshot::SnapshotCrate;
use crate::track::LibraryTrack;
use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const DATABASE_FILE: &str = "database V2";
const SUBCRATE_DIR: &str = "Subcrates";
const CRATE_VERSION: &str = "1.0/Serato ScratchLive Crate";

/// The create-playlist / add-track / persist triple the approver needs.
///
/// [`SeratoLibrary`] is the production implementation; tests use an
/// in-memory fake to observe what the approver would have created.
pub trait LibraryWriter {
    type Playlist;

    /// Start a new, empty playlist with the given display name.
    fn create_playlist(&mut self, name: &str) -> Result<Self::Playlist>;

    /// Append a track's file path to the playlist.
    fn add_track(&mut self, playlist: &mut Self::Playlist, file_path: &str);

    /// Write the playlist into the library.
    fn persist(&mut self, playlist: Self::Playlist) -> Result<()>;
}

/// Handle on a `_Serato_` directory.
pub struct SeratoLibrary {
    serato_dir: PathBuf,
}

impl SeratoLibrary {
    /// Open the Serato library under a music folder. Accepts either the
    /// music folder itself or a direct path to its `_Serato_` directory.
    pub fn open(music_root: &Path) -> Result<Self> {
        let serato_dir = if music_root.ends_with("_Serato_") {
            music_root.to_path_buf()
        } else {
            music_root.join("_Serato_")
        };
        if !serato_dir.is_dir() {
            bail!(
                "No _Serato_ directory found under {}; point --library-root at your music folder",
                music_root.display()
            );
        }
        Ok(Self { serato_dir })
    }

    /// Read every subcrate, joined with track metadata from `database V2`.
    ///
    /// Crates come back in filename order; tracks keep their in-crate
    /// order. A crate entry whose path is missing from the database still
    /// appears, with only its file path populated.
    pub fn read_all_crates(&self) -> Result<Vec<SnapshotCrate>> {
        let metadata = self.read_database()?;

        let subcrates = self.serato_dir.join(SUBCRATE_DIR);
        if !subcrates.is_dir() {
            warn!("No Subcrates directory in {}", self.serato_dir.display());
            return Ok(Vec::new());
        }

        let mut crate_files: Vec<PathBuf> = fs::read_dir(&subcrates)
            .with_context(|| format!("Failed to list {}", subcrates.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "crate"))
            .collect();
        crate_files.sort();

        let mut crates = Vec::with_capacity(crate_files.len());
        for crate_path in crate_files {
            let name = crate_name_from_path(&crate_path);
            let mut tracks = Vec::new();
            for file_path in read_crate_paths(&crate_path)? {
                match metadata.get(&file_path) {
                    Some(track) => tracks.push(track.clone()),
                    None => {
                        debug!("Crate '{name}' references untagged path {file_path}");
                        tracks.push(LibraryTrack {
                            artist: String::new(),
                            title: String::new(),
                            genre: String::new(),
                            bpm: None,
                            comment: String::new(),
                            file_path,
                        });
                    }
                }
            }
            debug!("Read crate '{}' with {} tracks", name, tracks.len());
            crates.push(SnapshotCrate { name, tracks });
        }

        info!("Read {} crates from {}", crates.len(), subcrates.display());
        Ok(crates)
    }

    /// Parse `database V2` into a path-keyed metadata table. A missing
    /// database is tolerated; crates then snapshot with bare paths.
    fn read_database(&self) -> Result<HashMap<String, LibraryTrack>> {
        let path = self.serato_dir.join(DATABASE_FILE);
        if !path.is_file() {
            warn!("No '{DATABASE_FILE}' in {}; snapshot will lack tag metadata", self.serato_dir.display());
            return Ok(HashMap::new());
        }

        let buf = fs::read(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut tracks = HashMap::new();
        for (tag, payload) in Chunks::over(&buf) {
            if &tag == b"otrk" {
                if let Some(track) = decode_track_record(payload) {
                    tracks.insert(track.file_path.clone(), track);
                }
            }
        }

        info!("Read {} track records from '{DATABASE_FILE}'", tracks.len());
        Ok(tracks)
    }

    fn subcrate_dir(&self) -> PathBuf {
        self.serato_dir.join(SUBCRATE_DIR)
    }
}

impl LibraryWriter for SeratoLibrary {
    type Playlist = CrateFile;

    fn create_playlist(&mut self, name: &str) -> Result<CrateFile> {
        Ok(CrateFile::new(name))
    }

    fn add_track(&mut self, playlist: &mut CrateFile, file_path: &str) {
        playlist.add_song(file_path);
    }

    fn persist(&mut self, playlist: CrateFile) -> Result<()> {
        let dir = self.subcrate_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(playlist.file_name());
        fs::write(&path, playlist.encode())
            .with_context(|| format!("Failed to write crate file {}", path.display()))?;
        info!(
            "Persisted crate '{}' ({} tracks) to {}",
            playlist.name,
            playlist.song_paths.len(),
            path.display()
        );
        Ok(())
    }
}

/// An in-memory crate pending persistence.
#[derive(Debug, Clone)]
pub struct CrateFile {
    pub name: String,
    song_paths: Vec<String>,
}

impl CrateFile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            song_paths: Vec::new(),
        }
    }

    pub fn add_song(&mut self, file_path: &str) {
        self.song_paths.push(file_path.to_string());
    }

    /// Filename inside `Subcrates/`. Path separators would nest the crate,
    /// so they are flattened out of the display name.
    fn file_name(&self) -> String {
        let safe = self.name.replace(['/', '\\'], "-");
        format!("{safe}.crate")
    }

    /// Encode as a Serato crate file: a `vrsn` header followed by one
    /// `otrk`/`ptrk` pair per song.
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_chunk(&mut out, b"vrsn", &encode_text(CRATE_VERSION));
        for path in &self.song_paths {
            let mut otrk = Vec::new();
            write_chunk(&mut otrk, b"ptrk", &encode_text(to_serato_path(path)));
            write_chunk(&mut out, b"otrk", &otrk);
        }
        out
    }
}

/// Track paths referenced by a crate file, in crate order.
fn read_crate_paths(path: &Path) -> Result<Vec<String>> {
    let buf = fs::read(path)
        .with_context(|| format!("Failed to read crate file {}", path.display()))?;

    let mut paths = Vec::new();
    for (tag, payload) in Chunks::over(&buf) {
        if &tag != b"otrk" {
            continue;
        }
        for (inner, field) in Chunks::over(payload) {
            if &inner == b"ptrk" {
                paths.push(from_serato_path(&decode_text(field)));
            }
        }
    }
    Ok(paths)
}

fn crate_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().replace("%%", "/"))
        .unwrap_or_default()
}

/// Decode one database `otrk` record. Returns `None` when the record has
/// no `pfil` path, which is what identifies a track.
fn decode_track_record(payload: &[u8]) -> Option<LibraryTrack> {
    let mut file_path = None;
    let mut artist = String::new();
    let mut title = String::new();
    let mut genre = String::new();
    let mut comment = String::new();
    let mut bpm = None;

    for (tag, field) in Chunks::over(payload) {
        match &tag {
            b"pfil" => file_path = Some(from_serato_path(&decode_text(field))),
            b"tsng" => title = decode_text(field),
            b"tart" => artist = decode_text(field),
            b"tgen" => genre = decode_text(field),
            b"tcom" => comment = decode_text(field),
            // BPM is stored as text; zero means "not analyzed".
            b"tbpm" => {
                bpm = decode_text(field)
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|value| *value > 0.0);
            }
            _ => {}
        }
    }

    Some(LibraryTrack {
        artist,
        title,
        genre,
        bpm,
        comment,
        file_path: file_path?,
    })
}

/// Iterator over tag/length framed chunks. Stops at the first truncated
/// chunk rather than erroring; Serato itself is tolerant of short tails.
struct Chunks<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Chunks<'a> {
    fn over(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = ([u8; 4], &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        let header_end = self.pos.checked_add(8)?;
        if header_end > self.buf.len() {
            return None;
        }
        let tag: [u8; 4] = self.buf[self.pos..self.pos + 4].try_into().ok()?;
        let len =
            u32::from_be_bytes(self.buf[self.pos + 4..header_end].try_into().ok()?) as usize;
        let end = header_end.checked_add(len)?;
        if end > self.buf.len() {
            return None;
        }
        self.pos = end;
        Some((tag, &self.buf[header_end..end]))
    }
}

fn write_chunk(out: &mut Vec<u8>, tag: &[u8; 4], payload: &[u8]) {
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
}

fn decode_text(payload: &[u8]) -> String {
    let units: Vec<u16> = payload
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
        .trim_end_matches('\0')
        .to_string()
}

fn encode_text(text: &str) -> Vec<u8> {
    text.encode_utf16().flat_map(u16::to_be_bytes).collect()
}

/// Serato stores paths relative to the volume root, without a leading
/// slash; the interchange documents use absolute paths.
fn from_serato_path(raw: &str) -> String {
    if raw.starts_with('/') {
        raw.to_string()
    } else {
        format!("/{raw}")
    }
}

fn to_serato_path(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
