//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Cache calls can
//! block on the arena lock or on file I/O, so they run on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use parking_lot::Mutex;

use crate::backend::DynBackend;
use crate::cache::{Cache, CacheEngine, Probe};
use crate::clock::current_timestamp_ms;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, DeleteResponse, GetResponse, HealthResponse, MetaResponse,
    PartitionQuery, SetRequest, SetResponse, StatsResponse,
};

/// Cache type served over HTTP.
pub type SharedCache = Arc<Mutex<Cache<DynBackend>>>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache,
}

impl AppState {
    pub fn new(cache: Cache<DynBackend>) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
        }
    }

    /// Opens the configured backend and wraps it in a cache front.
    pub fn from_config(config: &Config) -> Result<Self> {
        let backend = config.build_backend()?;
        Ok(Self::new(Cache::with_options(
            backend,
            crate::clock::SystemClock,
            config.cache_options(),
        )))
    }

    /// Runs `op` against the cache on the blocking pool.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Cache<DynBackend>) -> Result<T> + Send + 'static,
    {
        let cache = Arc::clone(&self.cache);
        tokio::task::spawn_blocking(move || op(&mut cache.lock()))
            .await
            .map_err(|e| CacheError::Internal(format!("cache task failed: {e}")))?
    }
}

fn resolve_partition(cache: &Cache<DynBackend>, partition: Option<String>) -> String {
    partition
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| cache.default_partition().to_string())
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(message) => Err(CacheError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let response = state
        .run(move |cache| {
            let partition = resolve_partition(cache, req.partition.clone());
            let expiry = req.expiry();
            let stored = cache
                .partition(partition.as_str())
                .set(&req.key, &req.value, expiry)?;
            Ok(SetResponse::new(req.key, partition, stored))
        })
        .await?;

    Ok(Json(response))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<PartitionQuery>,
) -> Result<Json<GetResponse>> {
    check_key(&key)?;

    let response = state
        .run(move |cache| {
            let partition = resolve_partition(cache, query.partition);
            match cache
                .partition(partition.as_str())
                .probe::<serde_json::Value>(&key)?
            {
                Probe::Ready(value) => Ok(GetResponse::new(key, partition, value)),
                Probe::Miss | Probe::Filling => Err(CacheError::NotFound(key)),
            }
        })
        .await?;

    Ok(Json(response))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<PartitionQuery>,
) -> Result<Json<DeleteResponse>> {
    check_key(&key)?;

    let response = state
        .run(move |cache| {
            let partition = resolve_partition(cache, query.partition);
            cache.partition(partition.as_str()).delete(&key)?;
            Ok(DeleteResponse::new(key, partition))
        })
        .await?;

    Ok(Json(response))
}

/// Handler for GET /meta/:key
pub async fn meta_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<PartitionQuery>,
) -> Result<Json<MetaResponse>> {
    check_key(&key)?;

    let response = state
        .run(move |cache| {
            let partition = resolve_partition(cache, query.partition);
            let meta = cache
                .partition(partition.as_str())
                .meta(&key)?
                .ok_or_else(|| CacheError::NotFound(key.clone()))?;
            Ok(MetaResponse::new(key, partition, meta, current_timestamp_ms()))
        })
        .await?;

    Ok(Json(response))
}

/// Handler for POST /clear
///
/// Bumps the partition generation; old entries become unreachable at once
/// and are reclaimed by eviction.
pub async fn clear_handler(
    State(state): State<AppState>,
    Query(query): Query<PartitionQuery>,
) -> Result<Json<ClearResponse>> {
    let response = state
        .run(move |cache| {
            let partition = resolve_partition(cache, query.partition);
            let generation = cache.clear_partition(&partition)?;
            Ok(ClearResponse {
                partition,
                generation,
            })
        })
        .await?;

    Ok(Json(response))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>> {
    let stats = state
        .run(|cache| Ok(StatsResponse::new(cache.backend().name(), cache.stats())))
        .await?;
    Ok(Json(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
