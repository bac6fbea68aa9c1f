//! Harmonic key model
//!
//! Maps (pitch class, mode) pairs onto the 24-slot harmonic wheel
//! (`1A`..`12A` for minor keys, `1B`..`12B` for major keys) and scores how
//! well two wheel positions mix.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wheel numbers for minor keys, indexed by pitch class (0 = C .. 11 = B)
const MINOR_WHEEL: [u8; 12] = [5, 12, 7, 2, 9, 4, 11, 6, 1, 8, 3, 10];

/// Wheel numbers for major keys, indexed by pitch class
const MAJOR_WHEEL: [u8; 12] = [8, 3, 10, 5, 12, 7, 2, 9, 4, 11, 6, 1];

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

const UNKNOWN: &str = "Unknown";

/// Major/minor half of the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// Letter `A`, track mode 0
    Minor,
    /// Letter `B`, track mode 1
    Major,
}

impl KeyMode {
    /// Decode the integer mode used by track records (0 = minor, 1 = major)
    pub fn from_mode(mode: i32) -> Option<Self> {
        match mode {
            0 => Some(KeyMode::Minor),
            1 => Some(KeyMode::Major),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            KeyMode::Minor => 'A',
            KeyMode::Major => 'B',
        }
    }
}

/// A position on the harmonic wheel, or `Unknown` when the source key
/// could not be mapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarmonicKey {
    Slot { number: u8, mode: KeyMode },
    Unknown,
}

impl HarmonicKey {
    /// Convert a pitch class (0-11) and mode (0/1) into wheel notation.
    ///
    /// Anything outside the 24 valid pairs yields [`HarmonicKey::Unknown`].
    pub fn from_pitch_class(pitch_class: i32, mode: i32) -> Self {
        let Some(mode) = KeyMode::from_mode(mode) else {
            return HarmonicKey::Unknown;
        };
        let Some(index) = pitch_index(pitch_class) else {
            return HarmonicKey::Unknown;
        };
        let number = match mode {
            KeyMode::Minor => MINOR_WHEEL[index],
            KeyMode::Major => MAJOR_WHEEL[index],
        };
        HarmonicKey::Slot { number, mode }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, HarmonicKey::Unknown)
    }

    /// Score harmonic compatibility with another key, in [0.0, 1.0].
    ///
    /// Rules, first match wins:
    /// - either key unknown: 0.5
    /// - identical: 1.0
    /// - same number, other letter (relative major/minor): 0.95
    /// - one step, same letter: 0.85
    /// - one step, other letter: 0.75
    /// - two steps: 0.5
    /// - three or four steps: 0.25
    /// - otherwise: 0.1
    ///
    /// Steps are measured around the wheel, so `12A` and `1A` are adjacent.
    pub fn similarity(&self, other: &HarmonicKey) -> f64 {
        let (
            HarmonicKey::Slot { number: n1, mode: m1 },
            HarmonicKey::Slot { number: n2, mode: m2 },
        ) = (*self, *other)
        else {
            return 0.5;
        };

        if self == other {
            return 1.0;
        }

        let raw = (i32::from(n1) - i32::from(n2)).abs();
        let steps = raw.min(12 - raw);
        let same_letter = m1 == m2;

        match steps {
            0 if !same_letter => 0.95,
            1 if same_letter => 0.85,
            1 => 0.75,
            2 => 0.5,
            3 | 4 => 0.25,
            _ => 0.1,
        }
    }
}

impl fmt::Display for HarmonicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarmonicKey::Slot { number, mode } => write!(f, "{}{}", number, mode.letter()),
            HarmonicKey::Unknown => f.write_str(UNKNOWN),
        }
    }
}

impl FromStr for HarmonicKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(UNKNOWN) {
            return Ok(HarmonicKey::Unknown);
        }

        let invalid = || crate::Error::InvalidOption(format!("invalid harmonic key '{}'", s));
        if trimmed.len() < 2 || !trimmed.is_ascii() {
            return Err(invalid());
        }
        let (number, letter) = trimmed.split_at(trimmed.len() - 1);
        let mode = match letter {
            "A" | "a" => KeyMode::Minor,
            "B" | "b" => KeyMode::Major,
            _ => return Err(invalid()),
        };
        let number: u8 = number.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&number) {
            return Err(invalid());
        }
        Ok(HarmonicKey::Slot { number, mode })
    }
}

impl Serialize for HarmonicKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HarmonicKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Wheel notation for a pitch class and mode, e.g. `(0, 1)` -> `"8B"`
pub fn to_harmonic_key(pitch_class: i32, mode: i32) -> HarmonicKey {
    HarmonicKey::from_pitch_class(pitch_class, mode)
}

/// Human-readable key name such as `"C major"` or `"A minor"`; `"Unknown"`
/// for anything outside the 24 valid pairs.
pub fn musical_key_name(pitch_class: i32, mode: i32) -> String {
    match (pitch_index(pitch_class), KeyMode::from_mode(mode)) {
        (Some(index), Some(KeyMode::Major)) => format!("{} major", NOTE_NAMES[index]),
        (Some(index), Some(KeyMode::Minor)) => format!("{} minor", NOTE_NAMES[index]),
        _ => UNKNOWN.to_string(),
    }
}

/// Harmonic compatibility between two wheel positions
pub fn harmonic_similarity(a: &HarmonicKey, b: &HarmonicKey) -> f64 {
    a.similarity(b)
}

fn pitch_index(pitch_class: i32) -> Option<usize> {
    usize::try_from(pitch_class).ok().filter(|i| *i < 12)
}
