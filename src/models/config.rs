use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use eink_dither::{EinkDitherer, EnhanceOptions, PhotoMode, RenderingMode, SegmentOptions};
use reqwest::Url;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5500";
pub const DEFAULT_SOURCE_URL: &str =
    "http://192.168.1.199:10000/lovelace-main/einkpanelcolor?viewport=800x480";
const DEFAULT_SOURCE_TIMEOUT: f64 = 10.0;
const DEFAULT_SOURCE_RETRIES: u32 = 2;
const DEFAULT_CACHE_TTL: f64 = 5.0;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 16;
const DEFAULT_SKY_GRAD_THR: f32 = 14.0;
const DEFAULT_SMOOTH_STRENGTH: u8 = 1;
const DEFAULT_EDGE_THR: f32 = 26.0;
const DEFAULT_UI_PALETTE_THR: u32 = 1800;
const DEFAULT_CONTRAST: f32 = 1.25;
const DEFAULT_SATURATION: f32 = 1.2;
const DEFAULT_GAMMA: f32 = 0.95;

/// Application configuration, built once at startup.
///
/// Every field is a long flag with an environment variable fallback, so the
/// container can be configured the usual way while tests and the CLI can
/// construct values directly.
#[derive(Debug, Clone, Default, Args)]
pub struct AppConfig {
    #[command(flatten)]
    pub server: ServerSettings,

    #[command(flatten)]
    pub upstream: UpstreamSettings,

    #[command(flatten)]
    pub cache: CacheSettings,

    #[command(flatten)]
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Args)]
pub struct ServerSettings {
    /// Address the HTTP server listens on
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct UpstreamSettings {
    /// Default upstream image URL
    #[arg(long, env = "SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    pub source_url: String,

    /// Per-attempt timeout in seconds
    #[arg(long, env = "SOURCE_TIMEOUT", default_value_t = DEFAULT_SOURCE_TIMEOUT)]
    pub source_timeout: f64,

    /// Retries after the first failed attempt
    #[arg(long, env = "SOURCE_RETRIES", default_value_t = DEFAULT_SOURCE_RETRIES)]
    pub source_retries: u32,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            source_retries: DEFAULT_SOURCE_RETRIES,
        }
    }
}

impl UpstreamSettings {
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.source_timeout).unwrap_or(Duration::ZERO)
    }

    /// Total number of fetch attempts per request.
    pub fn attempts(&self) -> u32 {
        self.source_retries.saturating_add(1)
    }
}

#[derive(Debug, Clone, Args)]
pub struct CacheSettings {
    /// Render cache time-to-live in seconds
    #[arg(long, env = "CACHE_TTL", default_value_t = DEFAULT_CACHE_TTL)]
    pub cache_ttl: f64,

    /// Maximum number of stored renders
    #[arg(long, env = "CACHE_MAX_ENTRIES", default_value_t = DEFAULT_CACHE_MAX_ENTRIES)]
    pub cache_max_entries: usize,

    /// Concurrent CPU renders (0 = available parallelism)
    #[arg(long, env = "RENDER_WORKERS", default_value_t = 0)]
    pub render_workers: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            render_workers: 0,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::try_from_secs_f64(self.cache_ttl).unwrap_or(Duration::ZERO)
    }

    pub fn workers(&self) -> usize {
        if self.render_workers > 0 {
            return self.render_workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }
}

/// Tunables that change rendered pixels.
#[derive(Debug, Clone, Args)]
pub struct RenderSettings {
    /// Algorithm for photographic content: hybrid, fs, stucki or ordered
    #[arg(long, env = "PHOTO_MODE", default_value_t = PhotoMode::Hybrid, value_parser = PhotoMode::from_str)]
    pub photo_mode: PhotoMode,

    /// Neighbourhood activity at which content counts as photographic
    #[arg(long = "sky-grad-thr", env = "SKY_GRAD_THR", default_value_t = DEFAULT_SKY_GRAD_THR)]
    pub sky_gradient_threshold: f32,

    /// Mask majority-filter radius (0 disables)
    #[arg(long = "smooth", env = "SMOOTH_STRENGTH", default_value_t = DEFAULT_SMOOTH_STRENGTH)]
    pub smooth_strength: u8,

    /// Per-pixel gradient at which a pixel is an edge
    #[arg(long = "edge-thr", env = "EDGE_THR", default_value_t = DEFAULT_EDGE_THR)]
    pub edge_threshold: f32,

    /// Squared RGB distance under which a colour counts as a UI colour
    #[arg(long = "ui-palette-thr", env = "UI_PALETTE_THR", default_value_t = DEFAULT_UI_PALETTE_THR)]
    pub ui_palette_threshold: u32,

    #[arg(long, env = "CONTRAST", default_value_t = DEFAULT_CONTRAST)]
    pub contrast: f32,

    #[arg(long, env = "SATURATION", default_value_t = DEFAULT_SATURATION)]
    pub saturation: f32,

    #[arg(long, env = "GAMMA", default_value_t = DEFAULT_GAMMA)]
    pub gamma: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            photo_mode: PhotoMode::Hybrid,
            sky_gradient_threshold: DEFAULT_SKY_GRAD_THR,
            smooth_strength: DEFAULT_SMOOTH_STRENGTH,
            edge_threshold: DEFAULT_EDGE_THR,
            ui_palette_threshold: DEFAULT_UI_PALETTE_THR,
            contrast: DEFAULT_CONTRAST,
            saturation: DEFAULT_SATURATION,
            gamma: DEFAULT_GAMMA,
        }
    }
}

impl RenderSettings {
    /// Deterministic summary of every output-affecting tunable.
    ///
    /// Part of every rendered cache key, so changing any of these values
    /// never serves a stale render.
    pub fn fingerprint(&self) -> String {
        format!(
            "photo={};sky={};smooth={};edge={};fit={};contrast={};saturation={};gamma={}",
            self.photo_mode,
            self.sky_gradient_threshold,
            self.smooth_strength,
            self.edge_threshold,
            self.ui_palette_threshold,
            self.contrast,
            self.saturation,
            self.gamma,
        )
    }

    pub fn segment_options(&self) -> SegmentOptions {
        SegmentOptions::new()
            .sky_gradient_threshold(self.sky_gradient_threshold)
            .edge_threshold(self.edge_threshold)
            .smooth_strength(self.smooth_strength)
            .palette_fit_threshold(self.ui_palette_threshold)
    }

    pub fn enhance_options(&self) -> EnhanceOptions {
        EnhanceOptions::new()
            .contrast(self.contrast)
            .saturation(self.saturation)
            .gamma(self.gamma)
    }

    /// Ditherer for one request.
    pub fn ditherer(&self, mode: RenderingMode) -> EinkDitherer {
        EinkDitherer::new(mode)
            .photo_mode(self.photo_mode)
            .enhance(self.enhance_options())
            .segmentation(self.segment_options())
    }
}

impl AppConfig {
    /// Defaults with a different upstream, mostly for tests and the CLI.
    pub fn with_source(source_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.upstream.source_url = source_url.into();
        config
    }

    /// Parsed default upstream URL.
    pub fn source_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.upstream.source_url).map_err(|e| ConfigError::SourceUrl {
            url: self.upstream.source_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
            return Err(ConfigError::SourceUrl {
                url: self.upstream.source_url.clone(),
                reason: "expected an absolute http(s) URL".to_string(),
            });
        }
        Ok(url)
    }

    /// Reject values the services cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source_url()?;

        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    name,
                    requirement: "positive",
                    value,
                })
            }
        };

        positive("SOURCE_TIMEOUT", self.upstream.source_timeout)?;
        positive("CONTRAST", self.render.contrast as f64)?;
        positive("SATURATION", self.render.saturation as f64)?;
        positive("GAMMA", self.render.gamma as f64)?;

        if !(self.cache.cache_ttl.is_finite() && self.cache.cache_ttl >= 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "CACHE_TTL",
                requirement: "zero or positive",
                value: self.cache.cache_ttl,
            });
        }
        if self.cache.cache_max_entries == 0 {
            return Err(ConfigError::OutOfRange {
                name: "CACHE_MAX_ENTRIES",
                requirement: "at least 1",
                value: 0.0,
            });
        }
        Ok(())
    }
}
