use axum::{
    extract::State,
    response::{Html, Json},
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::models::AppConfig;
use crate::services::RenderCache;

/// Liveness report
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    /// Algorithm used for photographic content
    pub photo_mode: String,
    pub sky_grad_thr: f32,
    /// Mask smoothing radius
    pub smooth: u8,
    /// Fresh renders currently cached
    pub cache_entries: usize,
}

/// Process health; never touches the upstream
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "Status"
)]
pub async fn handle_health(
    State(config): State<Arc<AppConfig>>,
    State(cache): State<Arc<RenderCache>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        photo_mode: config.render.photo_mode.to_string(),
        sky_grad_thr: config.render.sky_gradient_threshold,
        smooth: config.render.smooth_strength,
        cache_entries: cache.len(),
    })
}

/// Index page with endpoint links and the active tunables
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "HTML index", content_type = "text/html"),
    ),
    tag = "Status"
)]
pub async fn handle_index(State(config): State<Arc<AppConfig>>) -> Html<String> {
    let render = &config.render;
    let rows = [
        ("SOURCE_URL", config.upstream.source_url.clone()),
        ("PHOTO_MODE", render.photo_mode.to_string()),
        ("SKY_GRAD_THR", render.sky_gradient_threshold.to_string()),
        ("SMOOTH_STRENGTH", render.smooth_strength.to_string()),
        ("EDGE_THR", render.edge_threshold.to_string()),
        ("UI_PALETTE_THR", render.ui_palette_threshold.to_string()),
        ("CONTRAST", render.contrast.to_string()),
        ("SATURATION", render.saturation.to_string()),
        ("GAMMA", render.gamma.to_string()),
        ("CACHE_TTL", config.cache.cache_ttl.to_string()),
        ("SOURCE_TIMEOUT", config.upstream.source_timeout.to_string()),
        ("SOURCE_RETRIES", config.upstream.source_retries.to_string()),
    ];
    let table: String = rows
        .iter()
        .map(|(name, value)| {
            format!(
                "<tr><td><code>{name}</code></td><td>{}</td></tr>\n",
                escape_html(value)
            )
        })
        .collect();

    Html(format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>eink-proxy</title></head>
<body>
<h1>eink-proxy {version}</h1>
<ul>
<li><a href="/eink-image">/eink-image</a> (regional dithering)</li>
<li><a href="/eink-image?dither=true">/eink-image?dither=true</a></li>
<li><a href="/eink-image?dither=false">/eink-image?dither=false</a></li>
<li><a href="/raw">/raw</a></li>
<li><a href="/debug/masks">/debug/masks</a></li>
<li><a href="/health">/health</a></li>
<li><a href="/swagger-ui">/swagger-ui</a></li>
</ul>
<table>
{table}</table>
</body>
</html>
"#,
        version = env!("CARGO_PKG_VERSION"),
    ))
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
