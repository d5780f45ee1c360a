//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use eink_proxy::models::AppConfig;
use eink_proxy::server::{build_router, create_app_state};
use eink_proxy::services::RenderCache;

use super::upstream::MockUpstream;

/// Test application with router and direct access to the render cache
pub struct TestApp {
    router: axum::Router,
    pub config: Arc<AppConfig>,
    pub cache: Arc<RenderCache>,
}

impl TestApp {
    /// App whose default source is `/panel?view=main` on the mock upstream
    pub fn new(upstream: &MockUpstream) -> Self {
        Self::with_config(Self::config_for(upstream))
    }

    /// Short timeouts and a long TTL, suitable for most tests
    pub fn config_for(upstream: &MockUpstream) -> AppConfig {
        let mut config = AppConfig::with_source(upstream.url_for("/panel?view=main"));
        config.upstream.source_timeout = 2.0;
        config.upstream.source_retries = 2;
        config.cache.cache_ttl = 60.0;
        config.cache.render_workers = 2;
        config
    }

    pub fn with_config(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let state = create_app_state(config.clone()).expect("Failed to create app state");
        let cache = state.cache.clone();

        // Same router as production, minus Swagger UI
        let router = build_router(state);

        Self {
            router,
            config,
            cache,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::get(path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the body as an RGB image
    pub fn decode_rgb(&self) -> image::RgbImage {
        image::load_from_memory(&self.body)
            .expect("Body is not a decodable image")
            .to_rgb8()
    }
}
