use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Startup configuration that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid SOURCE_URL '{url}': {reason}")]
    SourceUrl { url: String, reason: String },

    #[error("{name} must be {requirement}, got {value}")]
    OutOfRange {
        name: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// A request override that cannot be turned into an upstream URL.
    #[error("Invalid override '{param}': {reason}")]
    InvalidOverride {
        /// Name of the rejected query parameter
        param: &'static str,
        reason: String,
    },
}

impl ResolveError {
    pub fn invalid(param: &'static str, reason: impl Into<String>) -> Self {
        ResolveError::InvalidOverride {
            param,
            reason: reason.into(),
        }
    }

    pub fn param(&self) -> &'static str {
        match self {
            ResolveError::InvalidOverride { param, .. } => param,
        }
    }
}

/// Why a single fetch attempt failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("failed to read body: {0}")]
    Body(String),

    #[error("undecodable image: {0}")]
    Decode(String),
}

impl FetchFailure {
    /// Whether another attempt could succeed. Client errors and other
    /// non-5xx statuses are final.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchFailure::Status(code) => *code >= 500,
            _ => true,
        }
    }
}

/// The upstream could not deliver a usable image.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Upstream failed after {attempts} attempt(s): {last_cause}")]
pub struct UpstreamError {
    pub attempts: u32,
    pub last_cause: FetchFailure,
}

impl UpstreamError {
    pub fn status_code(&self) -> StatusCode {
        match self.last_cause {
            FetchFailure::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("Unsupported dimensions: {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },

    #[error("Dither error: {0}")]
    Dither(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Failure of a shared fetch-and-render job.
///
/// Wrapped in an `Arc` when handed to every request waiting on the job.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    InvalidOverride(#[from] ResolveError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Arc<PipelineError>> for ApiError {
    fn from(e: Arc<PipelineError>) -> Self {
        match e.as_ref() {
            PipelineError::Upstream(err) => ApiError::Upstream(err.clone()),
            PipelineError::Render(err) => ApiError::Render(err.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidOverride(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(e) => e.status_code(),
            ApiError::Render(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            ApiError::InvalidOverride(_) => tracing::debug!(error = %self, "Rejected request"),
            ApiError::Upstream(_) => tracing::warn!(error = %self, "Upstream unavailable"),
            _ => tracing::error!(error = %self, "Request failed"),
        }

        let body = match &self {
            ApiError::InvalidOverride(e) => json!({
                "status": status.as_u16(),
                "error": self.to_string(),
                "parameter": e.param(),
            }),
            _ => json!({
                "status": status.as_u16(),
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
