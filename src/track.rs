//! Track records shared by the snapshot, proposal, and history documents.
//!
//! Two families live here:
//!
//! - [`LibraryTrack`] - a track as catalogued in the library snapshot. The
//!   `filePath` is the unique identifier; everything else is metadata copied
//!   from Serato's tags. Immutable once snapshotted.
//! - [`HistoryTrack`] - one play event from the exported history log. The
//!   BPM and timestamp columns arrive as free text and are parsed lazily
//!   through accessor methods, so malformed values degrade to fallbacks
//!   instead of failing the run.

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// A track as it appears in the library snapshot.
///
/// Field names serialize in camelCase (`filePath`) to stay byte-compatible
/// with the snapshot and proposal JSON documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryTrack {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    /// Tag BPM. Absent or empty tags stay `None`; a `None` BPM never wins
    /// the proximity comparison during matching.
    #[serde(default)]
    pub bpm: Option<f64>,
    /// Free-text comment field. Energy values (1-10) are encoded here ad hoc.
    #[serde(default)]
    pub comment: String,
    pub file_path: String,
}

impl LibraryTrack {
    /// Energy value encoded in the comment field.
    ///
    /// Parses the leading integer of the trimmed comment, so "6 - peak time"
    /// yields 6. Absent or unparseable comments yield 0, which fails every
    /// energy-gated rule.
    pub fn energy(&self) -> u32 {
        leading_int(&self.comment).unwrap_or(0)
    }
}

/// One play event from the history log.
///
/// The raw column values are kept as strings; `bpm()` and `start_time()`
/// do the lenient parsing.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryTrack {
    /// Track title. The history export calls this column "name".
    #[serde(rename = "name")]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    /// BPM column, possibly malformed ("N/A", empty, trailing junk).
    #[serde(default)]
    pub bpm: String,
    /// Timestamp of the play event, as exported.
    #[serde(rename = "start time", default)]
    pub started_at: String,
}

impl HistoryTrack {
    /// Played BPM, or `None` when the column doesn't parse as a float.
    pub fn bpm(&self) -> Option<f64> {
        self.bpm.trim().parse::<f64>().ok()
    }

    /// Full play timestamp, trying the formats history exports actually use.
    pub fn start_time(&self) -> Option<NaiveDateTime> {
        let raw = self.started_at.trim();
        if raw.is_empty() {
            return None;
        }
        const FORMATS: [&str; 3] = [
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%dT%H:%M:%S",
            "%m/%d/%Y %H:%M:%S",
        ];
        FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    /// Clock time of the play event, for the time-windowed rules.
    ///
    /// Falls back to parsing a bare time when the export omits the date.
    pub fn start_clock(&self) -> Option<NaiveTime> {
        if let Some(dt) = self.start_time() {
            return Some(dt.time());
        }
        let raw = self.started_at.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .ok()
    }
}

/// Parse the leading unsigned integer of a string, `parseInt`-style.
fn leading_int(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    let digits: &str = match trimmed.find(|c: char| !c.is_ascii_digit()) {
        Some(0) => return None,
        Some(end) => &trimmed[..end],
        None if trimmed.is_empty() => return None,
        None => trimmed,
    };
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track_with_comment(comment: &str) -> LibraryTrack {
        LibraryTrack {
            artist: String::new(),
            title: String::new(),
            genre: String::new(),
            bpm: None,
            comment: comment.to_string(),
            file_path: "/a.mp3".to_string(),
        }
    }

    #[test]
    fn energy_parses_leading_integer() {
        assert_eq!(track_with_comment("6").energy(), 6);
        assert_eq!(track_with_comment(" 7 ").energy(), 7);
        assert_eq!(track_with_comment("6 - peak time").energy(), 6);
        assert_eq!(track_with_comment("10/10 would play").energy(), 10);
    }

    #[test]
    fn energy_defaults_to_zero() {
        assert_eq!(track_with_comment("").energy(), 0);
        assert_eq!(track_with_comment("peak time").energy(), 0);
        assert_eq!(track_with_comment("energy 6").energy(), 0);
    }

    fn history(bpm: &str, started_at: &str) -> HistoryTrack {
        HistoryTrack {
            title: "Song".to_string(),
            artist: String::new(),
            genre: String::new(),
            bpm: bpm.to_string(),
            started_at: started_at.to_string(),
        }
    }

    #[test]
    fn history_bpm_lenient() {
        assert_eq!(history("128", "").bpm(), Some(128.0));
        assert_eq!(history(" 127.5 ", "").bpm(), Some(127.5));
        assert_eq!(history("N/A", "").bpm(), None);
        assert_eq!(history("", "").bpm(), None);
    }

    #[test]
    fn start_time_accepts_common_formats() {
        assert!(history("", "2025-10-25 23:14:02").start_time().is_some());
        assert!(history("", "2025-10-25T23:14:02").start_time().is_some());
        assert!(history("", "10/25/2025 23:14:02").start_time().is_some());
        assert!(history("", "last saturday").start_time().is_none());
    }

    #[test]
    fn start_clock_falls_back_to_bare_time() {
        let clock = history("", "23:14:02").start_clock().unwrap();
        assert_eq!(clock, NaiveTime::from_hms_opt(23, 14, 2).unwrap());
        assert!(history("", "").start_clock().is_none());
    }

    #[test]
    fn library_track_round_trips_camel_case() {
        let json = r#"{"artist":"A","title":"T","genre":"House","bpm":128.0,"comment":"6","filePath":"/a.mp3"}"#;
        let track: LibraryTrack = serde_json::from_str(json).unwrap();
        assert_eq!(track.file_path, "/a.mp3");
        let back = serde_json::to_string(&track).unwrap();
        assert!(back.contains("\"filePath\""));
    }
}
