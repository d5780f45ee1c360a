//! Mock upstream renderer backed by wiremock.

use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

/// Wrapper around wiremock MockServer with convenience methods
pub struct MockUpstream {
    pub server: MockServer,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// URL for a path (and optional query) on the mock
    pub fn url_for(&self, path_and_query: &str) -> String {
        format!("{}{}", self.server.uri(), path_and_query)
    }

    fn png(body: Vec<u8>) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body, "image/png")
    }

    /// Serve `body` as a PNG at `endpoint`
    pub async fn mock_png(&self, endpoint: &str, body: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(Self::png(body))
            .mount(&self.server)
            .await;
    }

    /// Serve a PNG and verify on drop that it was fetched exactly `times` times
    pub async fn mock_png_expect(&self, endpoint: &str, body: Vec<u8>, times: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(Self::png(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Serve a PNG after a delay
    pub async fn mock_png_delayed(&self, endpoint: &str, body: Vec<u8>, delay: Duration) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(Self::png(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    /// Serve arbitrary bytes with a content type
    pub async fn mock_body(&self, endpoint: &str, body: Vec<u8>, content_type: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, content_type))
            .mount(&self.server)
            .await;
    }

    /// Respond with a status and verify the number of hits on drop
    pub async fn mock_status(&self, endpoint: &str, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Fail with `status` for the first `failures` requests
    pub async fn mock_flaky(&self, endpoint: &str, status: u16, failures: u64) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status))
            .up_to_n_times(failures)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Requests received so far for one path
    pub async fn requests_to(&self, endpoint: &str) -> Vec<Request> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.url.path() == endpoint)
            .collect()
    }
}
