//! API Handlers
//!
//! HTTP request handlers exposing the cache manager's access patterns.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::warn;

use crate::cache::{
    CacheManager, DynMedium, FileMedium, ManagerStats, MemoryMedium, SharedCache, SystemClock,
    Tier,
};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    ClearResponse, DeleteResponse, ExistsResponse, GetResponse, HealthResponse, SetRequest,
    SetResponse,
};

/// The manager type hosted by the server: JSON values over boxed media.
pub type ServerCache = CacheManager<Value, DynMedium, DynMedium>;

/// Application state shared across all handlers.
///
/// The manager is wrapped in Arc<RwLock<>> so every compound
/// read-check-mutate sequence runs under one lock.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache<Value>,
}

impl AppState {
    /// Creates a new AppState around an already built manager.
    pub fn new(cache: ServerCache) -> Self {
        Self {
            cache: cache.into_shared(),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// The session tier lives in process memory. The persistent tier uses a
    /// file at `config.data_path`; if that cannot be opened the tier falls
    /// back to process memory and a warning is logged.
    pub fn from_config(config: &Config) -> Self {
        let session: DynMedium = Box::new(MemoryMedium::new());
        let persistent: DynMedium = match config.data_path.as_deref().map(FileMedium::open) {
            Some(Ok(medium)) => Box::new(medium),
            Some(Err(e)) => {
                warn!(error = %e, "persistent tier unavailable, falling back to memory");
                Box::new(MemoryMedium::new())
            }
            None => {
                warn!("no data directory, persistent tier falls back to memory");
                Box::new(MemoryMedium::new())
            }
        };

        Self::new(CacheManager::new(
            &config.cache,
            session,
            persistent,
            Arc::new(SystemClock),
        ))
    }
}

/// Handler for PUT /cache/:tier
///
/// Stores a value through the chosen access pattern.
pub async fn set_handler(
    State(state): State<AppState>,
    Path(tier): Path<Tier>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set_in(tier, &req.key, req.value, req.ttl);

    Ok(Json(SetResponse::new(tier, req.key)))
}

/// Handler for GET /cache/:tier/:key
///
/// Reads a value. Takes the write lock: reads update hit/miss counters,
/// delete expired entries and, for `smart`, promote values.
pub async fn get_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(Tier, String)>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.write().await;
    let value = cache
        .get_in(tier, &key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(tier, key, value)))
}

/// Handler for GET /cache/:tier/:key/exists
pub async fn exists_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(Tier, String)>,
) -> Json<ExistsResponse> {
    let exists = state.cache.write().await.has_in(tier, &key);
    Json(ExistsResponse { tier, key, exists })
}

/// Handler for DELETE /cache/:tier/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((tier, key)): Path<(Tier, String)>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    if !cache.delete_in(tier, &key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(tier, key)))
}

/// Handler for DELETE /cache/:tier
pub async fn clear_tier_handler(
    State(state): State<AppState>,
    Path(tier): Path<Tier>,
) -> Json<ClearResponse> {
    state.cache.write().await.clear_in(tier);
    Json(ClearResponse::tier(tier))
}

/// Handler for DELETE /cache
pub async fn clear_all_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.write().await.clear_all();
    Json(ClearResponse::all())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<ManagerStats> {
    let cache = state.cache.read().await;
    Json(cache.stats())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
