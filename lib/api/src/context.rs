use mixwheel_core::{Catalog, Result};
use mixwheel_similarity::{EngineConfig, GenreSimilarityModel, RecommendationEngine};
use std::sync::Arc;
use tracing::info;

/// Everything a request handler needs, built once at startup.
///
/// The catalog and fitted genre model are shared read-only between the
/// engine and the handlers.
#[derive(Debug, Clone)]
pub struct ServiceContext {
    pub catalog: Arc<Catalog>,
    pub genres: Arc<GenreSimilarityModel>,
    pub engine: RecommendationEngine,
}

impl ServiceContext {
    /// Fit the genre model over `catalog` and build the engine
    pub fn build(catalog: Catalog, config: EngineConfig) -> Result<Self> {
        let catalog = Arc::new(catalog);
        let genres = Arc::new(GenreSimilarityModel::fitted(&catalog)?);
        let engine = RecommendationEngine::with_config(catalog.clone(), genres.clone(), config)?;

        info!(
            "Service ready: {} tracks across {} genres",
            catalog.len(),
            genres.table()?.len()
        );

        Ok(Self {
            catalog,
            genres,
            engine,
        })
    }
}
