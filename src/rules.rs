//! The crate rule catalog.
//!
//! Each rule is a named predicate over a matched (library, history) pair.
//! The catalog is static but the numeric boundaries are not: they live in
//! [`RuleThresholds`], injected by the caller, so the engine stays pure and
//! a test can tighten or loosen a band without touching the predicates.
//!
//! Genre checks are case-sensitive containment or equality against the
//! library track's genre tag. Energy comes from the library comment field
//! ([`LibraryTrack::energy`], 0 when absent). Time-windowed rules compare
//! the play event's clock time against fixed boundaries, wrapping past
//! midnight.

use crate::track::{HistoryTrack, LibraryTrack};
use chrono::NaiveTime;

/// Numeric boundaries for the rule catalog, with the stock values as
/// defaults. These are business constants first and configuration second;
/// the struct exists so they are declared in one place and injectable.
#[derive(Debug, Clone)]
pub struct RuleThresholds {
    /// Minimum energy for the high-energy crate.
    pub high_energy_min: u32,
    /// Inclusive energy band for the midnight house crate.
    pub midnight_energy: (u32, u32),
    /// Start of the midnight window (clock time).
    pub midnight_start: NaiveTime,
    /// End of the midnight window (clock time, past midnight).
    pub midnight_end: NaiveTime,
    /// Minimum library BPM for the closing-time crate.
    pub closing_bpm_min: f64,
    /// Exclusive energy ceiling for the warm-up crate (floor is 1).
    pub warmup_energy_max: u32,
    /// Exclusive BPM band for the warm-up crate.
    pub warmup_bpm: (f64, f64),
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            high_energy_min: 6,
            midnight_energy: (5, 7),
            midnight_start: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
            midnight_end: NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
            closing_bpm_min: 120.0,
            warmup_energy_max: 7,
            warmup_bpm: (65.0, 120.0),
        }
    }
}

impl RuleThresholds {
    /// Whether a clock time falls inside the midnight window. The window
    /// wraps past midnight when `midnight_start > midnight_end`.
    fn in_midnight_window(&self, clock: NaiveTime) -> bool {
        if self.midnight_start <= self.midnight_end {
            clock >= self.midnight_start && clock <= self.midnight_end
        } else {
            clock >= self.midnight_start || clock <= self.midnight_end
        }
    }
}

/// Which predicate a [`CrateRule`] evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    HighEnergy,
    MidnightHouse,
    HipHopAndRb,
    ClosingTime,
    OpenFormatWarmup,
}

/// A named rule from the catalog.
#[derive(Debug, Clone)]
pub struct CrateRule {
    /// Stable identifier, used by the operator to approve the crate.
    pub id: &'static str,
    /// Display name for the created crate.
    pub name: &'static str,
    kind: RuleKind,
}

impl CrateRule {
    /// Evaluate this rule's predicate for a matched pair.
    ///
    /// Predicates read only their two inputs and the thresholds. Absent
    /// numeric fields fail numeric comparisons: a missing library BPM never
    /// passes a BPM gate, energy 0 never passes an energy floor.
    pub fn matches(
        &self,
        library: &LibraryTrack,
        history: &HistoryTrack,
        thresholds: &RuleThresholds,
    ) -> bool {
        match self.kind {
            RuleKind::HighEnergy => {
                library.genre.contains("House") && library.energy() >= thresholds.high_energy_min
            }
            RuleKind::MidnightHouse => {
                let (lo, hi) = thresholds.midnight_energy;
                let energy = library.energy();
                library.genre == "House"
                    && energy >= lo
                    && energy <= hi
                    && history
                        .start_clock()
                        .is_some_and(|clock| thresholds.in_midnight_window(clock))
            }
            RuleKind::HipHopAndRb => {
                library.genre.contains("Hip Hop") || library.genre.contains("R&B")
            }
            RuleKind::ClosingTime => {
                !library.genre.contains("House")
                    && library.bpm.is_some_and(|bpm| bpm >= thresholds.closing_bpm_min)
            }
            RuleKind::OpenFormatWarmup => {
                let energy = library.energy();
                let (bpm_lo, bpm_hi) = thresholds.warmup_bpm;
                energy > 0
                    && energy < thresholds.warmup_energy_max
                    && library
                        .bpm
                        .is_some_and(|bpm| bpm > bpm_lo && bpm < bpm_hi)
            }
        }
    }
}

/// The stock rule catalog, in proposal order.
pub fn catalog() -> Vec<CrateRule> {
    vec![
        CrateRule {
            id: "high_energy_mix",
            name: "AI - High Energy Mix",
            kind: RuleKind::HighEnergy,
        },
        CrateRule {
            id: "midnight_house_mix",
            name: "AI - Midnight House Mix",
            kind: RuleKind::MidnightHouse,
        },
        CrateRule {
            id: "hip_hop_and_rb",
            name: "AI - Hip-Hop & R&B",
            kind: RuleKind::HipHopAndRb,
        },
        CrateRule {
            id: "closing_time_mix",
            name: "AI - Closing Time Mix",
            kind: RuleKind::ClosingTime,
        },
        CrateRule {
            id: "open_format_warmup",
            name: "AI - Open Format Warmup",
            kind: RuleKind::OpenFormatWarmup,
        },
    ]
}
