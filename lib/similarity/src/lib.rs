//! # mixwheel Similarity
//!
//! Compatibility scoring and ranking for DJ track transitions.
//!
//! ## Features
//!
//! - **Compatibility scorers**: tempo (with half/double-time detection),
//!   bounded features such as energy, and loudness, each under a direction
//! - **Genre similarity**: standardized genre centroids and a pairwise
//!   distance table with human-readable explanations
//! - **Recommendation engine**: genre-aware candidate filtering, weighted
//!   scoring, harmonic filtering, deduplication and ranking
//! - **Explainability**: per-dimension score breakdown for every result
//!
//! ## Example
//!
//! ```rust
//! use mixwheel_core::Catalog;
//! use mixwheel_similarity::{GenreSimilarityModel, RecommendationEngine, RecommendOptions};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let tracks = serde_json::from_value(json!([
//!     {"track_id": "a", "track_name": "Opener", "artists": "DJ A", "track_genre": "house",
//!      "tempo": 128.0, "energy": 0.8, "loudness": -6.0, "key": 0, "mode": 1},
//!     {"track_id": "b", "track_name": "Follow", "artists": "DJ B", "track_genre": "house",
//!      "tempo": 126.0, "energy": 0.75, "loudness": -6.5, "key": 9, "mode": 0}
//! ])).unwrap();
//! let catalog = Arc::new(Catalog::from_tracks(tracks));
//! let genres = Arc::new(GenreSimilarityModel::fitted(&catalog).unwrap());
//! let engine = RecommendationEngine::new(catalog.clone(), genres).unwrap();
//!
//! let current = catalog.get("a").unwrap();
//! let results = engine.recommend(current, &RecommendOptions::default()).unwrap();
//! assert_eq!(results[0].track.id, "b");
//! assert_eq!(results[0].harmonic.harmonic_score, 0.95);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────>│    Genre    │────>│  Candidate  │
//! │  (tracks)   │     │    model    │     │  filtering  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                      ┌─────────────┐           │
//!                      │   Scorers   │<──────────┘
//!                      │ (per track) │
//!                      └─────────────┘
//!                             │
//!                      ┌─────────────┐
//!                      │   Explain   │
//!                      │  (results)  │
//!                      └─────────────┘
//! ```

pub mod direction;
pub mod explain;
pub mod genre;
pub mod options;
pub mod recommend;
pub mod scoring;

pub use direction::{Direction, TempoDirection};
pub use explain::{HarmonicInfo, RecommendationResult, RecommendationStats, ScoreBreakdown};
pub use genre::{GenreMatch, GenreProfile, GenreSimilarityModel, GenreTable, GENRE_FEATURES};
pub use options::{CategoryWeights, EngineConfig, RecommendOptions};
pub use recommend::{RecommendationEngine, VECTOR_FEATURES};
pub use scoring::{
    feature_compatibility, loudness_compatibility, tempo_compatibility, weighted_cosine,
    DEFAULT_TEMPO_TOLERANCE,
};
