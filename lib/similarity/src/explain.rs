//! Explainability for recommendation results
//!
//! Output structures that show how a candidate's total score was assembled
//! and where it sits on the harmonic wheel.

use mixwheel_core::{HarmonicKey, Track};
use serde::Serialize;

/// Per-dimension compatibility scores for one candidate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub tempo: f64,
    pub energy: f64,
    /// Feature-vector similarity with loudness blended in
    pub features: f64,
    /// Loudness compatibility before blending
    pub loudness: f64,
    pub total: f64,
}

impl ScoreBreakdown {
    /// Name of the component that scored highest; ties keep the earlier one
    pub fn strongest_component(&self) -> &'static str {
        let components = [
            ("tempo", self.tempo),
            ("energy", self.energy),
            ("features", self.features),
        ];
        let mut best = components[0];
        for candidate in &components[1..] {
            if candidate.1 > best.1 {
                best = *candidate;
            }
        }
        best.0
    }
}

/// Harmonic placement of a candidate relative to the current track
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicInfo {
    pub harmonic_key: HarmonicKey,
    pub harmonic_score: f64,
    pub musical_key_name: String,
}

/// A recommended track with its score breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub track: Track,
    pub scores: ScoreBreakdown,
    pub harmonic: HarmonicInfo,
}

impl RecommendationResult {
    pub fn total(&self) -> f64 {
        self.scores.total
    }
}

/// Summary statistics for a recommendation call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationStats {
    /// Candidates left after genre filtering
    pub candidates_count: usize,
    pub results_count: usize,
    pub avg_total: f64,
    pub best_total: f64,
    /// Component that contributed most to the best result
    pub top_component: Option<String>,
}

impl RecommendationStats {
    /// Compute stats from ranked results (best first)
    pub fn compute(results: &[RecommendationResult], candidates_count: usize) -> Self {
        let Some(best) = results.first() else {
            return Self {
                candidates_count,
                results_count: 0,
                avg_total: 0.0,
                best_total: 0.0,
                top_component: None,
            };
        };

        let avg_total = results.iter().map(|r| r.total()).sum::<f64>() / results.len() as f64;

        Self {
            candidates_count,
            results_count: results.len(),
            avg_total,
            best_total: best.total(),
            top_component: Some(best.scores.strongest_component().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result(id: &str, tempo: f64, energy: f64, features: f64, total: f64) -> RecommendationResult {
        let track: Track = serde_json::from_value(json!({
            "track_id": id,
            "track_name": "Test",
            "artists": "Artist",
            "track_genre": "house",
            "tempo": 126.0,
            "energy": 0.7,
            "loudness": -7.0,
            "key": 9,
            "mode": 0
        }))
        .unwrap();
        RecommendationResult {
            harmonic: HarmonicInfo {
                harmonic_key: track.harmonic_key(),
                harmonic_score: 0.95,
                musical_key_name: track.musical_key_name(),
            },
            track,
            scores: ScoreBreakdown {
                tempo,
                energy,
                features,
                loudness: 0.8,
                total,
            },
        }
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(result("t1", 0.9, 0.8, 0.7, 0.8)).unwrap();

        assert_eq!(value["track"]["track_id"], "t1");
        assert_eq!(value["scores"]["total"], 0.8);
        assert!(value["scores"]["loudness"].is_number());
        assert_eq!(value["harmonic"]["harmonic_key"], "8A");
        assert_eq!(value["harmonic"]["harmonic_score"], 0.95);
        assert_eq!(value["harmonic"]["musical_key_name"], "A minor");
    }

    #[test]
    fn test_strongest_component() {
        let scores = result("t1", 0.4, 0.9, 0.6, 0.6).scores;
        assert_eq!(scores.strongest_component(), "energy");

        let tied = result("t1", 0.7, 0.7, 0.7, 0.7).scores;
        assert_eq!(tied.strongest_component(), "tempo");
    }

    #[test]
    fn test_stats() {
        let results = vec![
            result("1", 0.95, 0.9, 0.8, 0.9),
            result("2", 0.8, 0.8, 0.8, 0.8),
            result("3", 0.7, 0.7, 0.7, 0.7),
        ];
        let stats = RecommendationStats::compute(&results, 42);

        assert_eq!(stats.candidates_count, 42);
        assert_eq!(stats.results_count, 3);
        assert_eq!(stats.best_total, 0.9);
        assert!((stats.avg_total - 0.8).abs() < 1e-9);
        assert_eq!(stats.top_component.as_deref(), Some("tempo"));
    }

    #[test]
    fn test_empty_stats() {
        let stats = RecommendationStats::compute(&[], 5);
        assert_eq!(stats.candidates_count, 5);
        assert_eq!(stats.results_count, 0);
        assert!(stats.top_component.is_none());
    }
}
