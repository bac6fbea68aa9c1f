use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::key::{musical_key_name, HarmonicKey};

/// Value used for an optional audio feature the catalog did not provide
pub const DEFAULT_FEATURE_VALUE: f64 = 0.5;

/// Audio features tracked per track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFeature {
    Energy,
    Danceability,
    Valence,
    Tempo,
    Acousticness,
    Instrumentalness,
    Speechiness,
    Liveness,
    Loudness,
}

impl AudioFeature {
    /// Every tracked feature, in profile order
    pub const ALL: [AudioFeature; 9] = [
        AudioFeature::Energy,
        AudioFeature::Danceability,
        AudioFeature::Valence,
        AudioFeature::Tempo,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Speechiness,
        AudioFeature::Liveness,
        AudioFeature::Loudness,
    ];

    /// Features that accept a build/drop/maintain direction.
    ///
    /// Tempo is steered separately through a tempo direction.
    pub const DIRECTIONAL: [AudioFeature; 8] = [
        AudioFeature::Energy,
        AudioFeature::Danceability,
        AudioFeature::Valence,
        AudioFeature::Acousticness,
        AudioFeature::Instrumentalness,
        AudioFeature::Speechiness,
        AudioFeature::Liveness,
        AudioFeature::Loudness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AudioFeature::Energy => "energy",
            AudioFeature::Danceability => "danceability",
            AudioFeature::Valence => "valence",
            AudioFeature::Tempo => "tempo",
            AudioFeature::Acousticness => "acousticness",
            AudioFeature::Instrumentalness => "instrumentalness",
            AudioFeature::Speechiness => "speechiness",
            AudioFeature::Liveness => "liveness",
            AudioFeature::Loudness => "loudness",
        }
    }

    /// True for features normalized to [0, 1]
    pub fn is_unit_interval(self) -> bool {
        !matches!(self, AudioFeature::Tempo | AudioFeature::Loudness)
    }
}

impl fmt::Display for AudioFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AudioFeature {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AudioFeature::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::Error::InvalidOption(format!("unknown audio feature '{}'", s)))
    }
}

/// An immutable catalog track.
///
/// Field names on the wire follow the public tracks dataset columns
/// (`track_id`, `track_name`, `track_genre`, `key`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    #[serde(rename = "track_id")]
    pub id: String,
    #[serde(rename = "track_name")]
    pub name: String,
    /// Artist names, `;`-separated when there are several
    pub artists: String,
    #[serde(rename = "album_name", default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(rename = "track_genre")]
    pub genre: String,

    /// Beats per minute
    pub tempo: f64,
    pub energy: f64,
    /// Integrated loudness in dB, typically [-60, 0]
    pub loudness: f64,
    /// Pitch class 0-11 (C = 0)
    #[serde(rename = "key")]
    pub pitch_class: i32,
    /// 1 = major, 0 = minor
    pub mode: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub danceability: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acousticness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrumentalness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speechiness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liveness: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explicit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

impl Track {
    /// Value of an audio feature; optional features fall back to
    /// [`DEFAULT_FEATURE_VALUE`] when missing.
    pub fn feature(&self, feature: AudioFeature) -> f64 {
        let optional = match feature {
            AudioFeature::Energy => return self.energy,
            AudioFeature::Tempo => return self.tempo,
            AudioFeature::Loudness => return self.loudness,
            AudioFeature::Danceability => self.danceability,
            AudioFeature::Valence => self.valence,
            AudioFeature::Acousticness => self.acousticness,
            AudioFeature::Instrumentalness => self.instrumentalness,
            AudioFeature::Speechiness => self.speechiness,
            AudioFeature::Liveness => self.liveness,
        };
        optional.unwrap_or(DEFAULT_FEATURE_VALUE)
    }

    pub fn harmonic_key(&self) -> HarmonicKey {
        HarmonicKey::from_pitch_class(self.pitch_class, self.mode)
    }

    pub fn musical_key_name(&self) -> String {
        musical_key_name(self.pitch_class, self.mode)
    }

    /// Lower-cased (name, artists) pair used to spot duplicate releases
    pub fn dedup_key(&self) -> (String, String) {
        (self.name.to_lowercase(), self.artists.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_json() -> serde_json::Value {
        json!({
            "track_id": "t1",
            "track_name": "Strobe",
            "artists": "deadmau5",
            "track_genre": "progressive-house",
            "tempo": 128.0,
            "energy": 0.8,
            "loudness": -6.5,
            "key": 0,
            "mode": 1
        })
    }

    #[test]
    fn test_deserialize_dataset_columns() {
        let track: Track = serde_json::from_value(minimal_json()).unwrap();
        assert_eq!(track.id, "t1");
        assert_eq!(track.genre, "progressive-house");
        assert_eq!(track.harmonic_key().to_string(), "8B");
        assert_eq!(track.musical_key_name(), "C major");
    }

    #[test]
    fn test_missing_features_default() {
        let track: Track = serde_json::from_value(minimal_json()).unwrap();
        assert_eq!(track.feature(AudioFeature::Danceability), DEFAULT_FEATURE_VALUE);
        assert_eq!(track.feature(AudioFeature::Liveness), DEFAULT_FEATURE_VALUE);
        assert_eq!(track.feature(AudioFeature::Energy), 0.8);
        assert_eq!(track.feature(AudioFeature::Tempo), 128.0);
    }

    #[test]
    fn test_serialize_skips_absent_optionals() {
        let track: Track = serde_json::from_value(minimal_json()).unwrap();
        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["track_name"], "Strobe");
        assert!(value.get("valence").is_none());
        assert!(value.get("release_year").is_none());
    }

    #[test]
    fn test_release_year_passthrough() {
        let mut record = minimal_json();
        record["release_year"] = json!(2008);
        let track: Track = serde_json::from_value(record).unwrap();
        assert_eq!(track.release_year, Some(2008));

        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["release_year"], 2008);
    }

    #[test]
    fn test_dedup_key_lowercases() {
        let mut track: Track = serde_json::from_value(minimal_json()).unwrap();
        track.name = "STROBE".to_string();
        track.artists = "Deadmau5".to_string();
        assert_eq!(track.dedup_key(), ("strobe".to_string(), "deadmau5".to_string()));
    }

    #[test]
    fn test_feature_parse() {
        assert_eq!("Energy".parse::<AudioFeature>().unwrap(), AudioFeature::Energy);
        assert!("bassiness".parse::<AudioFeature>().is_err());
        assert!(!AudioFeature::DIRECTIONAL.contains(&AudioFeature::Tempo));
    }
}
