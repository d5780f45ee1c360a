use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::OutputKind;
use crate::services::{PipelineResult, RenderPipeline};

/// Response header reporting how the render cache served the request.
pub const RENDER_CACHE_HEADER: HeaderName = HeaderName::from_static("x-render-cache");

/// Raw query pairs in request order, repeated keys included.
pub type OverrideQuery = Query<Vec<(String, String)>>;

fn image_response(result: PipelineResult) -> Response {
    let content_type = HeaderValue::from_str(&result.image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
            (
                RENDER_CACHE_HEADER,
                HeaderValue::from_static(result.cache.as_str()),
            ),
        ],
        Body::from(result.image.body.clone()),
    )
        .into_response()
}

async fn serve(
    pipeline: &RenderPipeline,
    params: &[(String, String)],
    kind: OutputKind,
) -> Result<Response, ApiError> {
    let result = pipeline.serve(params, kind).await?;
    tracing::info!(
        kind = kind.as_str(),
        cache = result.cache.as_str(),
        bytes = result.image.body.len(),
        "Served image"
    );
    Ok(image_response(result))
}

/// Get the upstream image converted for a seven-colour e-ink panel
///
/// Photographic regions are dithered and flat UI regions are mapped
/// straight to the nearest panel colour, unless `dither` forces one way.
#[utoipa::path(
    get,
    path = "/eink-image",
    responses(
        (status = 200, description = "Indexed PNG in the seven-colour palette", content_type = "image/png"),
        (status = 400, description = "An override could not be resolved"),
        (status = 502, description = "Upstream failed after all retries"),
        (status = 504, description = "Upstream timed out on the last attempt"),
    ),
    params(
        ("dither" = Option<String>, Query, description = "true, false or regional (default)"),
        ("source" = Option<String>, Query, description = "Absolute URL replacing the upstream target"),
        ("source_base" = Option<String>, Query, description = "Replaces scheme, host and base path"),
        ("source_path" = Option<String>, Query, description = "Absolute or base-relative upstream path"),
    ),
    tag = "Images"
)]
pub async fn handle_eink_image(
    State(pipeline): State<Arc<RenderPipeline>>,
    Query(params): OverrideQuery,
) -> Result<Response, ApiError> {
    serve(&pipeline, &params, OutputKind::Eink).await
}

/// Get the upstream image unmodified
#[utoipa::path(
    get,
    path = "/raw",
    responses(
        (status = 200, description = "Upstream bytes with the upstream content type"),
        (status = 400, description = "An override could not be resolved"),
        (status = 502, description = "Upstream failed after all retries"),
        (status = 504, description = "Upstream timed out on the last attempt"),
    ),
    params(
        ("source" = Option<String>, Query, description = "Absolute URL replacing the upstream target"),
        ("source_base" = Option<String>, Query, description = "Replaces scheme, host and base path"),
        ("source_path" = Option<String>, Query, description = "Absolute or base-relative upstream path"),
    ),
    tag = "Images"
)]
pub async fn handle_raw(
    State(pipeline): State<Arc<RenderPipeline>>,
    Query(params): OverrideQuery,
) -> Result<Response, ApiError> {
    serve(&pipeline, &params, OutputKind::Raw).await
}

/// Visualise the segmentation mask
///
/// The rendered image with edges painted red, textured photo regions
/// green and smooth photo regions blue.
#[utoipa::path(
    get,
    path = "/debug/masks",
    responses(
        (status = 200, description = "Mask overlay PNG", content_type = "image/png"),
        (status = 400, description = "An override could not be resolved"),
        (status = 502, description = "Upstream failed after all retries"),
    ),
    params(
        ("dither" = Option<String>, Query, description = "true, false or regional (default)"),
        ("source" = Option<String>, Query, description = "Absolute URL replacing the upstream target"),
    ),
    tag = "Debug"
)]
pub async fn handle_debug_masks(
    State(pipeline): State<Arc<RenderPipeline>>,
    Query(params): OverrideQuery,
) -> Result<Response, ApiError> {
    serve(&pipeline, &params, OutputKind::Masks).await
}
