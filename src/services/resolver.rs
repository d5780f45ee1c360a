//! Turn request query parameters into an upstream URL and a cache key.
//!
//! Recognised keys:
//!
//! | Key | Effect |
//! |---|---|
//! | `source` / `source_url` | absolute URL replacing the whole target |
//! | `source_base` | replaces scheme, host and base path |
//! | `source_path` | absolute (`/x`) replaces the path, relative joins the base path |
//! | `dither` | rendering mode, never forwarded |
//!
//! Every other key is appended to the upstream query. Keys that already
//! exist upstream are kept alongside the new value.

use eink_dither::RenderingMode;
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::error::ResolveError;
use crate::models::{OutputKind, ResolvedRequest, SourceSpec};

/// Builds [`ResolvedRequest`]s against an immutable default source.
#[derive(Debug, Clone)]
pub struct UpstreamResolver {
    default: SourceSpec,
    fingerprint: String,
}

/// Recognised overrides of one request, last occurrence winning.
#[derive(Debug, Default)]
struct Overrides<'a> {
    source: Option<(&'static str, &'a str)>,
    base: Option<&'a str>,
    path: Option<&'a str>,
    dither: Option<&'a str>,
    extra: Vec<(&'a str, &'a str)>,
}

impl<'a> Overrides<'a> {
    fn collect(params: &'a [(String, String)]) -> Self {
        let mut overrides = Self::default();
        for (key, value) in params {
            match key.as_str() {
                "source" => overrides.source = Some(("source", value.as_str())),
                "source_url" => overrides.source = Some(("source_url", value.as_str())),
                "source_base" => overrides.base = Some(value.as_str()),
                "source_path" => overrides.path = Some(value.as_str()),
                "dither" => overrides.dither = Some(value.as_str()),
                other => overrides.extra.push((other, value.as_str())),
            }
        }
        overrides
    }
}

impl UpstreamResolver {
    /// `fingerprint` summarises the render tunables; it is mixed into the
    /// key of every rendered output.
    pub fn new(default: SourceSpec, fingerprint: impl Into<String>) -> Self {
        Self {
            default,
            fingerprint: fingerprint.into(),
        }
    }

    pub fn default_source(&self) -> &SourceSpec {
        &self.default
    }

    pub fn resolve(
        &self,
        params: &[(String, String)],
        kind: OutputKind,
    ) -> Result<ResolvedRequest, ResolveError> {
        let overrides = Overrides::collect(params);

        let rendering_mode = match overrides.dither {
            Some(value) => value
                .parse::<RenderingMode>()
                .map_err(|e| ResolveError::invalid("dither", e.to_string()))?,
            None => RenderingMode::Auto,
        };

        let mut effective_url = match overrides.source {
            Some((param, value)) => {
                if overrides.base.is_some() || overrides.path.is_some() {
                    tracing::debug!(
                        source = value,
                        "Ignoring source_base/source_path because a full source was given"
                    );
                }
                parse_absolute(param, value)?
            }
            None => self.derive_spec(&overrides)?.to_url(),
        };

        if !overrides.extra.is_empty() {
            effective_url
                .query_pairs_mut()
                .extend_pairs(overrides.extra.iter().copied());
        }

        let cache_key = self.cache_key(kind, &effective_url, rendering_mode);
        tracing::debug!(url = %effective_url, mode = %rendering_mode, kind = kind.as_str(), "Resolved request");

        Ok(ResolvedRequest {
            effective_url,
            rendering_mode,
            kind,
            cache_key,
        })
    }

    /// Apply `source_base` / `source_path` to a copy of the default.
    fn derive_spec(&self, overrides: &Overrides<'_>) -> Result<SourceSpec, ResolveError> {
        let mut spec = self.default.clone();

        if let Some(base) = overrides.base {
            let mut base_url = parse_absolute("source_base", base)?;
            base_url.set_query(None);
            base_url.set_fragment(None);
            spec.base_url = base_url;
        }

        if let Some(path) = overrides.path {
            spec.path = if path.starts_with('/') {
                normalize_path(path)
            } else {
                join_path(spec.base_url.path(), path)
            };
        }

        Ok(spec)
    }

    fn cache_key(&self, kind: OutputKind, url: &Url, mode: RenderingMode) -> String {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b"\n");
        hasher.update(url.as_str().as_bytes());
        if kind.is_rendered() {
            hasher.update(b"\n");
            hasher.update(mode.as_str().as_bytes());
            hasher.update(b"\n");
            hasher.update(self.fingerprint.as_bytes());
        }
        let digest = hasher.finalize();
        hex::encode(&digest[..16])
    }
}

fn parse_absolute(param: &'static str, value: &str) -> Result<Url, ResolveError> {
    let url = Url::parse(value.trim()).map_err(|e| ResolveError::invalid(param, e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ResolveError::invalid(
            param,
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if !url.has_host() {
        return Err(ResolveError::invalid(param, "missing host"));
    }
    Ok(url)
}

/// Join a relative path onto a base path.
fn join_path(base: &str, relative: &str) -> String {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    normalize_path(&format!("{base}{relative}"))
}

/// Collapse `.`, `..` and repeated slashes. Never climbs above the root.
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    let mut normalized = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !segments.is_empty() {
        normalized.push('/');
    }
    normalized
}
