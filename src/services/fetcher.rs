use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Url};

use crate::error::{FetchFailure, UpstreamError};
use crate::models::UpstreamSettings;
use crate::rendering::RawImage;

/// Something that can deliver a decoded upstream image.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawImage, UpstreamError>;
}

/// HTTP fetcher with a per-attempt timeout and a bounded retry count.
///
/// Transient failures (timeouts, connection errors, 5xx, bodies that do not
/// decode) are retried immediately; a 4xx ends the loop at once.
#[derive(Debug, Clone)]
pub struct UpstreamFetcher {
    client: Client,
    timeout: Duration,
    attempts: u32,
}

impl UpstreamFetcher {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, reqwest::Error> {
        let timeout = settings.timeout();
        let client = Client::builder()
            .user_agent(concat!("eink-proxy/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            timeout,
            attempts: settings.attempts(),
        })
    }

    async fn attempt(&self, url: &Url) -> Result<RawImage, FetchFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchFailure::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchFailure::Timeout(self.timeout)
            } else {
                FetchFailure::Body(e.to_string())
            }
        })?;

        tokio::task::spawn_blocking(move || RawImage::decode(bytes, content_type))
            .await
            .map_err(|e| FetchFailure::Decode(format!("decode task failed: {e}")))?
            .map_err(|e| FetchFailure::Decode(e.to_string()))
    }

    fn classify(&self, error: reqwest::Error) -> FetchFailure {
        if error.is_timeout() {
            FetchFailure::Timeout(self.timeout)
        } else if error.is_connect() {
            FetchFailure::Connect(error.to_string())
        } else {
            FetchFailure::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl ImageSource for UpstreamFetcher {
    async fn fetch(&self, url: &Url) -> Result<RawImage, UpstreamError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt(url).await {
                Ok(image) => {
                    tracing::debug!(
                        url = %url,
                        attempt,
                        width = image.width,
                        height = image.height,
                        format = ?image.format,
                        "Fetched upstream image"
                    );
                    return Ok(image);
                }
                Err(cause) => {
                    tracing::warn!(url = %url, attempt, error = %cause, "Upstream attempt failed");
                    if !cause.is_transient() || attempt >= self.attempts {
                        let error = UpstreamError {
                            attempts: attempt,
                            last_cause: cause,
                        };
                        tracing::error!(url = %url, error = %error, "Giving up on upstream");
                        return Err(error);
                    }
                }
            }
        }
    }
}
