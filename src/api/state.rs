use std::sync::Arc;

use sqlx::PgPool;

use crate::services::{CatalogQuery, RecommendationService, TieredSelector};
use crate::stores::{ActivityStore, CatalogStore, PgStore, RecommendationStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    /// Wires the engine against PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self::with_stores(store.clone(), store.clone(), store)
    }

    /// Wires the engine against arbitrary store implementations
    ///
    /// Integration tests use this with in-memory stores.
    pub fn with_stores(
        catalog: Arc<dyn CatalogStore>,
        activity: Arc<dyn ActivityStore>,
        sets: Arc<dyn RecommendationStore>,
    ) -> Self {
        let selector = TieredSelector::new(CatalogQuery::new(catalog.clone()), activity);
        let service =
            RecommendationService::new(selector, CatalogQuery::new(catalog), sets);

        Self {
            recommendations: Arc::new(service),
        }
    }
}
