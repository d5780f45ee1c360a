//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::{Query, State},
    http::{header::CONNECTION, HeaderValue},
    response::{Html, Json, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api::{self, HealthResponse};
use crate::error::ApiError;
use crate::models::{AppConfig, SourceSpec};
use crate::services::{
    ImageSource, RenderCache, RenderPipeline, RenderService, UpstreamFetcher, UpstreamResolver,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub cache: Arc<RenderCache>,
    pub pipeline: Arc<RenderPipeline>,
}

/// Create application state backed by the HTTP upstream fetcher.
pub fn create_app_state(config: Arc<AppConfig>) -> anyhow::Result<AppState> {
    let fetcher = UpstreamFetcher::new(&config.upstream)
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;
    create_app_state_with_source(config, Arc::new(fetcher))
}

/// Create application state with any image source.
pub fn create_app_state_with_source(
    config: Arc<AppConfig>,
    source: Arc<dyn ImageSource>,
) -> anyhow::Result<AppState> {
    config.validate()?;

    let default_source = SourceSpec::from_url(&config.source_url()?);
    let resolver = UpstreamResolver::new(default_source, config.render.fingerprint());
    let cache = Arc::new(RenderCache::new(
        config.cache.ttl(),
        config.cache.cache_max_entries,
    ));
    let renderer = Arc::new(RenderService::new(config.render.clone()));
    let workers = config.cache.workers();
    let pipeline = Arc::new(RenderPipeline::new(
        resolver,
        source,
        cache.clone(),
        renderer,
        workers,
    ));

    tracing::info!(
        source = %config.upstream.source_url,
        photo_mode = %config.render.photo_mode,
        workers,
        cache_ttl = config.cache.cache_ttl,
        "Render pipeline ready"
    );

    Ok(AppState {
        config,
        cache,
        pipeline,
    })
}

/// Build the API router with all endpoints and middleware.
///
/// This is the core router used by both production and tests.
/// It includes the `Connection: close` header because panel clients
/// open a fresh connection for every refresh.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/eink-image", get(handle_eink_image))
        .route("/raw", get(handle_raw))
        .route("/debug/masks", get(handle_debug_masks))
        .route("/health", get(handle_health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            CONNECTION,
            HeaderValue::from_static("close"),
        ))
}

// Wrapper handlers to extract state components for the underlying API handlers

async fn handle_eink_image(
    State(state): State<AppState>,
    query: api::image::OverrideQuery,
) -> Result<Response, ApiError> {
    api::handle_eink_image(State(state.pipeline), query).await
}

async fn handle_raw(
    State(state): State<AppState>,
    query: Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    api::handle_raw(State(state.pipeline), query).await
}

async fn handle_debug_masks(
    State(state): State<AppState>,
    query: Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    api::handle_debug_masks(State(state.pipeline), query).await
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    api::handle_health(State(state.config), State(state.cache)).await
}

async fn handle_index(State(state): State<AppState>) -> Html<String> {
    api::handle_index(State(state.config)).await
}
