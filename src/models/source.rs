use eink_dither::RenderingMode;
use reqwest::Url;
use serde::Serialize;

/// Where an upstream image comes from: origin plus base path, the resource
/// path, and an ordered query that may repeat keys.
///
/// The query is kept as the raw string it was configured with, so the
/// upstream receives it byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Scheme, host, port and base path. Relative paths join against
    /// this path.
    pub base_url: Url,
    /// Absolute resource path.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
}

impl SourceSpec {
    /// Split a full URL into a spec rooted at its origin.
    pub fn from_url(url: &Url) -> Self {
        let mut base_url = url.clone();
        base_url.set_path("/");
        base_url.set_query(None);
        base_url.set_fragment(None);
        Self {
            base_url,
            path: url.path().to_string(),
            query: url.query().filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    /// Compose the URL this spec points at.
    pub fn to_url(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&self.path);
        url.set_fragment(None);
        url.set_query(self.query.as_deref());
        url
    }
}

/// What a request wants from the upstream image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Seven-colour panel image
    Eink,
    /// Upstream bytes, untouched
    Raw,
    /// Segmentation overlay
    Masks,
}

impl OutputKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputKind::Eink => "eink",
            OutputKind::Raw => "raw",
            OutputKind::Masks => "masks",
        }
    }

    /// Whether the output depends on the render tunables.
    pub fn is_rendered(self) -> bool {
        !matches!(self, OutputKind::Raw)
    }
}

/// A request after override resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    pub effective_url: Url,
    pub rendering_mode: RenderingMode,
    pub kind: OutputKind,
    pub cache_key: String,
}
