pub mod config;
pub mod source;

pub use config::{AppConfig, CacheSettings, RenderSettings, ServerSettings, UpstreamSettings};
pub use source::{OutputKind, ResolvedRequest, SourceSpec};
