//! # mixwheel
//!
//! Track compatibility scoring and ranking for DJs.
//!
//! Given the track that is playing now, mixwheel ranks catalog tracks as the
//! next one to mix in: genre-aware candidate filtering, tempo/energy/feature
//! compatibility under directional intents, harmonic key matching on the
//! 24-slot wheel and deduplication of repeated releases.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! mixwheel --catalog tracks.jsonl --http-port 8000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use mixwheel::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(Catalog::load("tracks.jsonl")?);
//! let genres = Arc::new(GenreSimilarityModel::fitted(&catalog)?);
//! let engine = RecommendationEngine::new(catalog.clone(), genres)?;
//!
//! let current = catalog.require("4uLU6hMCjMI75M1A2tKUQC")?;
//! let options = RecommendOptions {
//!     energy_direction: Direction::Build,
//!     ..RecommendOptions::default()
//! };
//! for result in engine.recommend(current, &options)? {
//!     println!("{} ({}) {:.3}", result.track.name, result.harmonic.harmonic_key, result.total());
//! }
//! # Ok::<(), mixwheel::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! - `mixwheel-core` - Tracks, catalog loading and search, the harmonic key model
//! - `mixwheel-similarity` - Compatibility scorers, genre similarity, recommendation engine
//! - `mixwheel-api` - REST API over actix-web
//!
//! ## Features
//!
//! - **Harmonic Mixing**: Wheel-notation keys with graded compatibility
//! - **Half/Double Time**: Tempo matching that recognizes 2:1 tempo ratios
//! - **Directional Intent**: Build, drop or maintain energy and other features
//! - **Genre Neighbours**: Explainable genre-to-genre similarity

// Re-export core types
pub use mixwheel_core::{
    harmonic_similarity, musical_key_name, to_harmonic_key, AudioFeature, Catalog, Error,
    HarmonicKey, KeyMode, Result, Track,
};

// Re-export scoring and ranking
pub use mixwheel_similarity::{
    feature_compatibility, loudness_compatibility, tempo_compatibility, Direction, EngineConfig,
    GenreMatch, GenreSimilarityModel, RecommendOptions, RecommendationEngine,
    RecommendationResult, RecommendationStats, TempoDirection,
};

// Re-export API
pub use mixwheel_api::{RestApi, ServiceContext};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AudioFeature, Catalog, Direction, EngineConfig, Error, GenreSimilarityModel, HarmonicKey,
        RecommendOptions, RecommendationEngine, RecommendationResult, Result, TempoDirection,
        Track,
    };
}
