//! Recommendation engine
//!
//! Filters the catalog down to genre-compatible candidates, scores each one
//! against the current track and returns the best harmonic matches.

use crate::direction::Direction;
use crate::explain::{HarmonicInfo, RecommendationResult, RecommendationStats, ScoreBreakdown};
use crate::genre::GenreSimilarityModel;
use crate::options::{CategoryWeights, EngineConfig, RecommendOptions};
use crate::scoring::{
    feature_compatibility, loudness_compatibility, tempo_compatibility, weighted_cosine,
};
use ahash::AHashSet;
use mixwheel_core::{harmonic_similarity, AudioFeature, Catalog, Error, HarmonicKey, Result, Track};
use std::cmp::Ordering;
use std::sync::Arc;

/// Features compared by cosine similarity. Loudness is scored on its own
/// dB scale and blended in afterwards.
pub const VECTOR_FEATURES: [AudioFeature; 7] = [
    AudioFeature::Energy,
    AudioFeature::Danceability,
    AudioFeature::Valence,
    AudioFeature::Acousticness,
    AudioFeature::Instrumentalness,
    AudioFeature::Speechiness,
    AudioFeature::Liveness,
];

/// A candidate that passed scoring, borrowed from the catalog
struct Scored<'a> {
    track: &'a Track,
    scores: ScoreBreakdown,
    harmonic_key: HarmonicKey,
    harmonic_score: f64,
}

impl Scored<'_> {
    fn into_result(self) -> RecommendationResult {
        RecommendationResult {
            track: self.track.clone(),
            scores: self.scores,
            harmonic: HarmonicInfo {
                harmonic_key: self.harmonic_key,
                harmonic_score: self.harmonic_score,
                musical_key_name: self.track.musical_key_name(),
            },
        }
    }
}

/// Per-call values shared by every candidate
struct ScoringPlan<'a> {
    current: &'a Track,
    current_key: HarmonicKey,
    options: &'a RecommendOptions,
    weights: CategoryWeights,
    target: [f64; VECTOR_FEATURES.len()],
    feature_weights: [f64; VECTOR_FEATURES.len()],
    loudness_direction: Option<Direction>,
    loudness_blend: f64,
}

impl<'a> ScoringPlan<'a> {
    fn new(current: &'a Track, options: &'a RecommendOptions, config: &EngineConfig) -> Self {
        let weights = if options.has_custom_feature_weights() {
            config.advanced_weights
        } else {
            config.default_weights
        };

        let target = VECTOR_FEATURES.map(|feature| {
            let value = current.feature(feature);
            match options.feature_direction(feature) {
                Some(Direction::Build) => (value + config.target_step).min(1.0),
                Some(Direction::Drop) => (value - config.target_step).max(0.0),
                _ => value,
            }
        });

        // absent means maintain; an unrecognized token stays None and scores neutral
        let loudness_direction = match options.feature_directions.get(AudioFeature::Loudness.name()) {
            None => Some(Direction::Maintain),
            Some(token) => Direction::lenient(token),
        };

        Self {
            current,
            current_key: current.harmonic_key(),
            options,
            weights,
            target,
            feature_weights: VECTOR_FEATURES.map(|feature| options.feature_weight(feature)),
            loudness_direction,
            loudness_blend: config.loudness_blend,
        }
    }

    fn score<'t>(&self, candidate: &'t Track) -> Scored<'t> {
        let current = self.current;

        let tempo = tempo_compatibility(
            current.tempo,
            candidate.tempo,
            self.options.tempo_tolerance,
            self.options.tempo_direction,
        );
        let energy =
            feature_compatibility(current.energy, candidate.energy, self.options.energy_direction);

        let values = VECTOR_FEATURES.map(|feature| candidate.feature(feature));
        let vector = weighted_cosine(&values, &self.target, &self.feature_weights);
        let loudness =
            loudness_compatibility(current.loudness, candidate.loudness, self.loudness_direction);
        let features = (1.0 - self.loudness_blend) * vector + self.loudness_blend * loudness;

        let harmonic_key = candidate.harmonic_key();
        Scored {
            track: candidate,
            scores: ScoreBreakdown {
                tempo,
                energy,
                features,
                loudness,
                total: self.weights.total(tempo, energy, features),
            },
            harmonic_score: harmonic_similarity(&self.current_key, &harmonic_key),
            harmonic_key,
        }
    }
}

/// Ranks catalog tracks as the next track in a DJ set.
///
/// The engine holds shared, read-only handles to a loaded [`Catalog`] and a
/// fitted [`GenreSimilarityModel`]; `recommend` never mutates either, so one
/// engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    genres: Arc<GenreSimilarityModel>,
    config: EngineConfig,
}

impl RecommendationEngine {
    pub fn new(catalog: Arc<Catalog>, genres: Arc<GenreSimilarityModel>) -> Result<Self> {
        Self::with_config(catalog, genres, EngineConfig::default())
    }

    pub fn with_config(
        catalog: Arc<Catalog>,
        genres: Arc<GenreSimilarityModel>,
        config: EngineConfig,
    ) -> Result<Self> {
        if !catalog.is_loaded() {
            return Err(Error::CatalogNotLoaded);
        }
        if !genres.is_fitted() {
            return Err(Error::ModelNotFitted);
        }
        Ok(Self {
            catalog,
            genres,
            config,
        })
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn genre_model(&self) -> &Arc<GenreSimilarityModel> {
        &self.genres
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Recommend the next tracks after `current`, best first
    pub fn recommend(
        &self,
        current: &Track,
        options: &RecommendOptions,
    ) -> Result<Vec<RecommendationResult>> {
        self.recommend_with_stats(current, options)
            .map(|(results, _)| results)
    }

    /// Like [`recommend`](Self::recommend), also returning summary statistics
    pub fn recommend_with_stats(
        &self,
        current: &Track,
        options: &RecommendOptions,
    ) -> Result<(Vec<RecommendationResult>, RecommendationStats)> {
        options.validate()?;

        let candidates = self.candidates(current, options)?;
        let plan = ScoringPlan::new(current, options, &self.config);

        let mut seen = AHashSet::new();
        let mut ranked: Vec<Scored> = candidates
            .iter()
            .copied()
            .map(|track| plan.score(track))
            .filter(|scored| scored.harmonic_score >= options.harmonic_threshold)
            .filter(|scored| seen.insert(scored.track.dedup_key()))
            .collect();

        // stable: equal totals keep catalog order
        ranked.sort_by(|a, b| {
            b.scores
                .total
                .partial_cmp(&a.scores.total)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(options.limit);

        let results: Vec<RecommendationResult> =
            ranked.into_iter().map(Scored::into_result).collect();
        let stats = RecommendationStats::compute(&results, candidates.len());
        Ok((results, stats))
    }

    /// Catalog tracks eligible for scoring, in catalog order
    fn candidates(&self, current: &Track, options: &RecommendOptions) -> Result<Vec<&Track>> {
        let allowed: AHashSet<String> = match options.effective_genre_filter() {
            Some(genres) => genres.iter().cloned().collect(),
            None => {
                let mut genres: AHashSet<String> = self
                    .genres
                    .similar_genres(&current.genre, self.config.similar_genre_count)?
                    .into_iter()
                    .map(|m| m.genre)
                    .collect();
                genres.insert(current.genre.clone());
                genres
            }
        };

        Ok(self
            .catalog
            .tracks()
            .iter()
            .filter(|track| track.id != current.id && allowed.contains(&track.genre))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::TempoDirection;
    use serde_json::{json, Value};

    fn track(id: &str, name: &str, genre: &str, tempo: f64, energy: f64, key: i32, mode: i32) -> Track {
        track_with(id, name, genre, tempo, energy, key, mode, json!({}))
    }

    #[allow(clippy::too_many_arguments)]
    fn track_with(
        id: &str,
        name: &str,
        genre: &str,
        tempo: f64,
        energy: f64,
        key: i32,
        mode: i32,
        extra: Value,
    ) -> Track {
        let mut value = json!({
            "track_id": id,
            "track_name": name,
            "artists": format!("{} Artist", genre),
            "track_genre": genre,
            "tempo": tempo,
            "energy": energy,
            "loudness": -7.0,
            "key": key,
            "mode": mode,
            "danceability": 0.7,
            "valence": 0.5,
            "acousticness": 0.1,
            "instrumentalness": 0.6,
            "speechiness": 0.05,
            "liveness": 0.1
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).unwrap()
    }

    fn current() -> Track {
        track("current", "Opener", "house", 128.0, 0.8, 0, 1)
    }

    fn catalog() -> Catalog {
        Catalog::from_tracks(vec![
            current(),
            track("h1", "Groove One", "house", 127.0, 0.78, 0, 1),
            track("h2", "Groove Two", "house", 126.0, 0.7, 9, 0),
            track("h3", "Groove Three", "house", 129.0, 0.85, 7, 1),
            track("h4", "Off Key", "house", 128.0, 0.8, 6, 1),
            // same release as h1 under another id
            track("h5", "GROOVE ONE", "house", 127.0, 0.78, 0, 1),
            track("d1", "Deep Cut", "deep-house", 122.0, 0.65, 5, 1),
            track("t1", "Warehouse", "techno", 132.0, 0.9, 0, 1),
            track("a1", "Drift", "ambient", 70.0, 0.2, 0, 1),
            track("f1", "Campfire", "folk", 96.0, 0.3, 9, 0),
            track("c1", "Sonata", "classical", 88.0, 0.1, 0, 1),
            track("p1", "Hook", "pop", 118.0, 0.6, 0, 1),
            track("r1", "Riff", "rock", 140.0, 0.75, 0, 1),
        ])
    }

    fn engine() -> RecommendationEngine {
        let catalog = Arc::new(catalog());
        let genres = Arc::new(GenreSimilarityModel::fitted(&catalog).unwrap());
        RecommendationEngine::new(catalog, genres).unwrap()
    }

    #[test]
    fn test_requires_loaded_catalog() {
        let genres = Arc::new(GenreSimilarityModel::fitted(&catalog()).unwrap());
        let result = RecommendationEngine::new(Arc::new(Catalog::default()), genres);
        assert!(matches!(result, Err(Error::CatalogNotLoaded)));
    }

    #[test]
    fn test_requires_fitted_model() {
        let result = RecommendationEngine::new(
            Arc::new(catalog()),
            Arc::new(GenreSimilarityModel::new()),
        );
        assert!(matches!(result, Err(Error::ModelNotFitted)));
    }

    #[test]
    fn test_recommend_basic_properties() {
        let engine = engine();
        let results = engine.recommend(&current(), &RecommendOptions::default()).unwrap();

        assert!(!results.is_empty());
        assert!(results.len() <= 10);
        assert!(results.iter().all(|r| r.track.id != "current"));
        assert!(results.iter().all(|r| r.harmonic.harmonic_score >= 0.7));
        assert!(results.windows(2).all(|w| w[0].total() >= w[1].total()));
        assert!(results.iter().all(|r| (0.0..=1.0).contains(&r.total())));
    }

    #[test]
    fn test_harmonic_threshold_filters() {
        let engine = engine();
        let results = engine.recommend(&current(), &RecommendOptions::default()).unwrap();
        // 8B against F# major (2B) is far around the wheel
        assert!(results.iter().all(|r| r.track.id != "h4"));

        let everything = RecommendOptions::default().with_harmonic_threshold(0.0).with_limit(100);
        let results = engine.recommend(&current(), &everything).unwrap();
        assert!(results.iter().any(|r| r.track.id == "h4"));
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let engine = engine();
        let results = engine.recommend(&current(), &RecommendOptions::default()).unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.track.id.as_str()).collect();
        assert!(ids.contains(&"h1"));
        assert!(!ids.contains(&"h5"));
    }

    #[test]
    fn test_genre_filter() {
        let engine = engine();
        let options = RecommendOptions::default().with_genre_filter(["techno"]);
        let results = engine.recommend(&current(), &options).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].track.id, "t1");
    }

    #[test]
    fn test_empty_genre_filter_falls_back_to_similar_genres() {
        let engine = engine();
        let fallback = engine
            .recommend(&current(), &RecommendOptions::default().with_genre_filter(Vec::<String>::new()))
            .unwrap();
        let default = engine.recommend(&current(), &RecommendOptions::default()).unwrap();
        assert_eq!(fallback, default);
    }

    #[test]
    fn test_similar_genres_limit_candidates() {
        let engine = engine();
        let options = RecommendOptions::default().with_harmonic_threshold(0.0).with_limit(100);
        let (results, stats) = engine.recommend_with_stats(&current(), &options).unwrap();

        // own genre plus the five nearest of the six others
        let genres: AHashSet<&str> = results.iter().map(|r| r.track.genre.as_str()).collect();
        assert!(genres.len() <= 6);
        assert!(genres.contains("house"));
        assert_eq!(stats.results_count, results.len());
        assert!(stats.candidates_count >= results.len());
    }

    #[test]
    fn test_limit() {
        let engine = engine();
        let options = RecommendOptions::default().with_harmonic_threshold(0.0).with_limit(2);
        let results = engine.recommend(&current(), &options).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let engine = engine();
        let options = RecommendOptions::default()
            .with_feature_direction(AudioFeature::Valence, Direction::Build);
        let first = engine.recommend(&current(), &options).unwrap();
        let second = engine.recommend(&current(), &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_genre_of_current_track() {
        let engine = engine();
        let stranger = track("x", "Stranger", "polka", 120.0, 0.5, 0, 1);
        assert!(matches!(
            engine.recommend(&stranger, &RecommendOptions::default()),
            Err(Error::GenreNotFound(_))
        ));

        // an explicit filter does not need the genre model
        let options = RecommendOptions::default().with_genre_filter(["house"]);
        assert!(engine.recommend(&stranger, &options).is_ok());
    }

    #[test]
    fn test_invalid_options_rejected() {
        let engine = engine();
        let err = engine
            .recommend(&current(), &RecommendOptions::default().with_limit(0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_tempo_direction_changes_ranking() {
        let slow = track("s", "Slow", "house", 120.0, 0.8, 0, 1);
        let fast = track("f", "Fast", "house", 136.0, 0.8, 0, 1);
        let catalog = Arc::new(Catalog::from_tracks(vec![current(), slow, fast]));
        let genres = Arc::new(GenreSimilarityModel::fitted(&catalog).unwrap());
        let engine = RecommendationEngine::new(catalog, genres).unwrap();

        let mut options = RecommendOptions::default();
        options.tempo_direction = TempoDirection::Faster;
        let results = engine.recommend(&current(), &options).unwrap();
        assert_eq!(results[0].track.id, "f");

        options.tempo_direction = TempoDirection::Slower;
        let results = engine.recommend(&current(), &options).unwrap();
        assert_eq!(results[0].track.id, "s");
    }

    #[test]
    fn test_build_direction_moves_target() {
        let bright = track_with("b", "Bright", "house", 128.0, 0.8, 0, 1, json!({"valence": 0.9}));
        let dark = track_with("d", "Dark", "house", 128.0, 0.8, 0, 1, json!({"valence": 0.1}));
        let catalog = Arc::new(Catalog::from_tracks(vec![current(), dark, bright]));
        let genres = Arc::new(GenreSimilarityModel::fitted(&catalog).unwrap());
        let engine = RecommendationEngine::new(catalog, genres).unwrap();

        let build = RecommendOptions::default()
            .with_feature_direction(AudioFeature::Valence, Direction::Build);
        assert_eq!(engine.recommend(&current(), &build).unwrap()[0].track.id, "b");

        let drop = RecommendOptions::default()
            .with_feature_direction(AudioFeature::Valence, Direction::Drop);
        assert_eq!(engine.recommend(&current(), &drop).unwrap()[0].track.id, "d");
    }

    #[test]
    fn test_custom_weights_switch_category_weights() {
        let engine = engine();
        let plain = engine.recommend(&current(), &RecommendOptions::default()).unwrap();
        let weighted = engine
            .recommend(
                &current(),
                &RecommendOptions::default().with_feature_weight(AudioFeature::Danceability, 2.0),
            )
            .unwrap();

        let r = &weighted[0];
        let expected = CategoryWeights::ADVANCED.total(r.scores.tempo, r.scores.energy, r.scores.features);
        assert!((r.total() - expected).abs() < 1e-12);

        let p = &plain[0];
        let expected = CategoryWeights::DEFAULT.total(p.scores.tempo, p.scores.energy, p.scores.features);
        assert!((p.total() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_feature_score_blends_vector_and_loudness() {
        let current = current();
        let candidate = track_with(
            "c", "Candidate", "house", 126.0, 0.7, 9, 0,
            json!({"loudness": -9.0, "valence": 0.8, "acousticness": 0.3}),
        );
        let options = RecommendOptions::default()
            .with_feature_direction(AudioFeature::Loudness, Direction::Build);
        let config = EngineConfig::default();
        let scored = ScoringPlan::new(&current, &options, &config).score(&candidate);

        let values = VECTOR_FEATURES.map(|feature| candidate.feature(feature));
        let target = VECTOR_FEATURES.map(|feature| current.feature(feature));
        let vector = weighted_cosine(&values, &target, &[1.0; 7]);
        let loudness = loudness_compatibility(-7.0, -9.0, Some(Direction::Build));

        assert!(vector < 1.0);
        assert!((scored.scores.loudness - loudness).abs() < 1e-12);
        assert!((scored.scores.features - (0.85 * vector + 0.15 * loudness)).abs() < 1e-12);
    }

    #[test]
    fn test_target_clamps_to_unit_interval() {
        let current = track_with(
            "edge", "Edge", "house", 128.0, 0.8, 0, 1,
            json!({"valence": 0.95, "liveness": 0.05}),
        );
        let options = RecommendOptions::default()
            .with_feature_direction(AudioFeature::Valence, Direction::Build)
            .with_feature_direction(AudioFeature::Liveness, Direction::Drop)
            .with_feature_direction(AudioFeature::Danceability, Direction::Build);
        let config = EngineConfig::default();
        let plan = ScoringPlan::new(&current, &options, &config);

        let target = |feature: AudioFeature| {
            let index = VECTOR_FEATURES.iter().position(|f| *f == feature).unwrap();
            plan.target[index]
        };
        assert_eq!(target(AudioFeature::Valence), 1.0);
        assert_eq!(target(AudioFeature::Liveness), 0.0);
        assert!((target(AudioFeature::Danceability) - 0.85).abs() < 1e-12);
        assert_eq!(target(AudioFeature::Instrumentalness), 0.6);
    }

    #[test]
    fn test_unrecognized_loudness_direction_is_neutral() {
        let engine = engine();
        let mut options = RecommendOptions::default();
        options
            .feature_directions
            .insert("loudness".to_string(), "sideways".to_string());
        let results = engine.recommend(&current(), &options).unwrap();
        assert!(results.iter().all(|r| r.scores.loudness == 0.5));
    }
}
