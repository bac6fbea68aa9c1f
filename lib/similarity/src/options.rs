//! Recommendation options and engine configuration
//!
//! [`RecommendOptions`] is the per-call request; [`EngineConfig`] holds the
//! constants an engine is built with.

use crate::direction::{Direction, TempoDirection};
use crate::scoring::DEFAULT_TEMPO_TOLERANCE;
use mixwheel_core::{AudioFeature, Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Blend ratios across the tempo, energy and feature-vector scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub tempo: f64,
    pub energy: f64,
    pub features: f64,
}

impl CategoryWeights {
    pub const DEFAULT: CategoryWeights = CategoryWeights {
        tempo: 0.35,
        energy: 0.35,
        features: 0.30,
    };

    /// Used when the caller tunes individual feature weights
    pub const ADVANCED: CategoryWeights = CategoryWeights {
        tempo: 0.275,
        energy: 0.275,
        features: 0.45,
    };

    pub fn total(&self, tempo: f64, energy: f64, features: f64) -> f64 {
        self.tempo * tempo + self.energy * energy + self.features * features
    }
}

/// Constants a [`RecommendationEngine`](crate::RecommendationEngine) is built with
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Neighbouring genres admitted when no genre filter is given
    pub similar_genre_count: usize,
    /// How far a build/drop direction moves a feature target
    pub target_step: f64,
    pub default_weights: CategoryWeights,
    pub advanced_weights: CategoryWeights,
    /// Share of the feature score taken by loudness compatibility
    pub loudness_blend: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            similar_genre_count: 5,
            target_step: 0.15,
            default_weights: CategoryWeights::DEFAULT,
            advanced_weights: CategoryWeights::ADVANCED,
            loudness_blend: 0.15,
        }
    }
}

/// Options for a single `recommend` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendOptions {
    #[serde(default, alias = "bpm_direction")]
    pub tempo_direction: TempoDirection,

    #[serde(default)]
    pub energy_direction: Direction,

    /// Direction tokens keyed by feature name. Unrecognized tokens are kept
    /// as-is and treated softly: the target stays unchanged and loudness
    /// scores neutral.
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_directions: HashMap<String, String>,

    /// Per-feature weights for the feature vector; missing features weigh 1.0
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature_weights: HashMap<String, f64>,

    #[serde(default = "default_limit")]
    pub limit: usize,

    /// Explicit genre allow-list; empty means no filter
    #[serde(default)]
    pub genre_filter: Option<Vec<String>>,

    #[serde(default = "default_harmonic_threshold", alias = "camelot_threshold")]
    pub harmonic_threshold: f64,

    #[serde(default = "default_tempo_tolerance")]
    pub tempo_tolerance: f64,
}

/// Treat an explicit `null` the same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn default_limit() -> usize {
    10
}

fn default_harmonic_threshold() -> f64 {
    0.7
}

fn default_tempo_tolerance() -> f64 {
    DEFAULT_TEMPO_TOLERANCE
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            tempo_direction: TempoDirection::default(),
            energy_direction: Direction::default(),
            feature_directions: HashMap::new(),
            feature_weights: HashMap::new(),
            limit: default_limit(),
            genre_filter: None,
            harmonic_threshold: default_harmonic_threshold(),
            tempo_tolerance: default_tempo_tolerance(),
        }
    }
}

impl RecommendOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_harmonic_threshold(mut self, threshold: f64) -> Self {
        self.harmonic_threshold = threshold;
        self
    }

    pub fn with_genre_filter<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genre_filter = Some(genres.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_feature_direction(mut self, feature: AudioFeature, direction: Direction) -> Self {
        self.feature_directions
            .insert(feature.name().to_string(), direction.as_str().to_string());
        self
    }

    pub fn with_feature_weight(mut self, feature: AudioFeature, weight: f64) -> Self {
        self.feature_weights.insert(feature.name().to_string(), weight);
        self
    }

    /// Check value ranges
    /// - `limit` must be positive
    /// - `harmonic_threshold` must lie in [0, 1]
    /// - `tempo_tolerance` must be positive
    /// - feature weights must be non-negative
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidOption("limit must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.harmonic_threshold) {
            return Err(Error::InvalidOption(format!(
                "harmonic_threshold must be within [0, 1], got {}",
                self.harmonic_threshold
            )));
        }
        if !(self.tempo_tolerance > 0.0) {
            return Err(Error::InvalidOption(format!(
                "tempo_tolerance must be positive, got {}",
                self.tempo_tolerance
            )));
        }
        for (name, weight) in &self.feature_weights {
            if !(*weight >= 0.0) {
                return Err(Error::InvalidOption(format!(
                    "feature weight for '{}' must be non-negative",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Genre allow-list, with an empty list treated as absent
    pub fn effective_genre_filter(&self) -> Option<&[String]> {
        self.genre_filter.as_deref().filter(|genres| !genres.is_empty())
    }

    /// Direction token for a feature, parsed leniently
    pub fn feature_direction(&self, feature: AudioFeature) -> Option<Direction> {
        self.feature_directions
            .get(feature.name())
            .and_then(|token| Direction::lenient(token))
    }

    /// Weight for a feature, 1.0 when not supplied
    pub fn feature_weight(&self, feature: AudioFeature) -> f64 {
        self.feature_weights
            .get(feature.name())
            .copied()
            .unwrap_or(1.0)
    }

    /// True when any known feature weight differs from the 1.0 default.
    ///
    /// Names that are not directional features are ignored.
    pub fn has_custom_feature_weights(&self) -> bool {
        AudioFeature::DIRECTIONAL
            .iter()
            .any(|feature| self.feature_weight(*feature) != 1.0)
    }
}
