pub mod fetcher;
pub mod pipeline;
pub mod render_cache;
pub mod renderer;
pub mod resolver;

pub use fetcher::{ImageSource, UpstreamFetcher};
pub use pipeline::{PipelineFailure, PipelineResult, RenderPipeline};
pub use render_cache::{CacheLookup, RenderCache, RenderOutcome};
pub use renderer::RenderService;
pub use resolver::UpstreamResolver;
