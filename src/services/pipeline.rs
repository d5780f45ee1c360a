use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::error::{ApiError, PipelineError, RenderError, ResolveError};
use crate::models::{OutputKind, ResolvedRequest};
use crate::rendering::RenderedImage;
use crate::services::fetcher::ImageSource;
use crate::services::render_cache::{CacheLookup, RenderCache, RenderOutcome};
use crate::services::{RenderService, UpstreamResolver};

/// A served image and how the cache produced it.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub image: Arc<RenderedImage>,
    pub cache: CacheLookup,
}

/// Request resolution, upstream fetch, rendering and caching in one place.
///
/// ```text
/// params -> resolve -> cache? -> fetch -> render (worker permit) -> cache
/// ```
pub struct RenderPipeline {
    resolver: UpstreamResolver,
    source: Arc<dyn ImageSource>,
    cache: Arc<RenderCache>,
    renderer: Arc<RenderService>,
    workers: Arc<Semaphore>,
}

/// Why a pipeline request failed.
#[derive(Debug)]
pub enum PipelineFailure {
    Resolve(ResolveError),
    Pipeline(Arc<PipelineError>),
}

impl From<ResolveError> for PipelineFailure {
    fn from(e: ResolveError) -> Self {
        PipelineFailure::Resolve(e)
    }
}

impl From<PipelineFailure> for ApiError {
    fn from(failure: PipelineFailure) -> Self {
        match failure {
            PipelineFailure::Resolve(e) => e.into(),
            PipelineFailure::Pipeline(e) => e.into(),
        }
    }
}

impl RenderPipeline {
    pub fn new(
        resolver: UpstreamResolver,
        source: Arc<dyn ImageSource>,
        cache: Arc<RenderCache>,
        renderer: Arc<RenderService>,
        workers: usize,
    ) -> Self {
        Self {
            resolver,
            source,
            cache,
            renderer,
            workers: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn resolver(&self) -> &UpstreamResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn renderer(&self) -> &RenderService {
        &self.renderer
    }

    /// Resolve `params` for `kind` and serve the result.
    pub async fn serve(
        &self,
        params: &[(String, String)],
        kind: OutputKind,
    ) -> Result<PipelineResult, PipelineFailure> {
        let request = self.resolver.resolve(params, kind)?;
        self.serve_resolved(request)
            .await
            .map_err(PipelineFailure::Pipeline)
    }

    pub async fn serve_resolved(
        &self,
        request: ResolvedRequest,
    ) -> Result<PipelineResult, Arc<PipelineError>> {
        let key = request.cache_key.clone();
        let source = self.source.clone();
        let renderer = self.renderer.clone();
        let workers = self.workers.clone();

        let (outcome, cache) = self
            .cache
            .get_or_render(&key, move || run(request, source, renderer, workers))
            .await;

        outcome.map(|image| PipelineResult { image, cache })
    }
}

/// One fetch-and-render job. Runs as its own task, shared by every request
/// waiting on its key.
async fn run(
    request: ResolvedRequest,
    source: Arc<dyn ImageSource>,
    renderer: Arc<RenderService>,
    workers: Arc<Semaphore>,
) -> RenderOutcome {
    let raw = source
        .fetch(&request.effective_url)
        .await
        .map_err(|e| Arc::new(PipelineError::from(e)))?;

    let _permit = workers
        .acquire_owned()
        .await
        .map_err(|e| Arc::new(PipelineError::from(RenderError::Task(e.to_string()))))?;

    renderer
        .render_in_blocking_context(Arc::new(raw), request.kind, request.rendering_mode)
        .await
        .map(Arc::new)
        .map_err(|e| {
            tracing::error!(url = %request.effective_url, error = %e, "Render failed");
            Arc::new(PipelineError::from(e))
        })
}
