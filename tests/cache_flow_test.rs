//! End-to-end behaviour of the render cache.

mod common;

use common::{fixtures, MockUpstream, TestApp};
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn test_repeat_request_is_served_from_cache() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png_expect("/panel", fixtures::photo_png(32, 24), 1)
        .await;
    let app = TestApp::new(&upstream);

    let first = app.get("/eink-image").await;
    let second = app.get("/eink-image").await;

    common::assert_cache(&first, "miss");
    common::assert_cache(&second, "hit");
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_render() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png_delayed(
            "/panel",
            fixtures::photo_png(40, 40),
            Duration::from_millis(200),
        )
        .await;
    let app = TestApp::new(&upstream);

    let requests = (0..8).map(|_| app.get("/eink-image"));
    let responses = futures_util::future::join_all(requests).await;

    assert_eq!(upstream.requests_to("/panel").await.len(), 1);
    let misses = responses
        .iter()
        .filter(|r| r.header("x-render-cache") == Some("miss"))
        .count();
    assert_eq!(misses, 1);
    for response in &responses {
        common::assert_png(response);
        assert_eq!(response.body, responses[0].body);
    }
}

#[tokio::test]
async fn test_modes_are_cached_separately() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png_expect("/panel", fixtures::photo_png(16, 16), 3)
        .await;
    let app = TestApp::new(&upstream);

    for mode in ["true", "false", "regional"] {
        common::assert_cache(&app.get(&format!("/eink-image?dither={mode}")).await, "miss");
    }
    // Default mode is regional
    common::assert_cache(&app.get("/eink-image").await, "hit");
}

#[tokio::test]
async fn test_entries_expire_after_ttl() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png_expect("/panel", fixtures::dashboard_png(8, 8), 2)
        .await;
    let mut config = TestApp::config_for(&upstream);
    config.cache.cache_ttl = 0.2;
    let app = TestApp::with_config(config);

    common::assert_cache(&app.get("/eink-image").await, "miss");
    common::assert_cache(&app.get("/eink-image").await, "hit");
    tokio::time::sleep(Duration::from_millis(300)).await;
    common::assert_cache(&app.get("/eink-image").await, "miss");
}

#[tokio::test]
async fn test_zero_ttl_disables_reuse() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png_expect("/panel", fixtures::dashboard_png(8, 8), 2)
        .await;
    let mut config = TestApp::config_for(&upstream);
    config.cache.cache_ttl = 0.0;
    let app = TestApp::with_config(config);

    common::assert_cache(&app.get("/eink-image").await, "miss");
    common::assert_cache(&app.get("/eink-image").await, "miss");
    assert_eq!(app.cache.len(), 0);
}

#[tokio::test]
async fn test_cache_is_bounded() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png("/panel", fixtures::dashboard_png(8, 8))
        .await;
    let mut config = TestApp::config_for(&upstream);
    config.cache.cache_max_entries = 2;
    let app = TestApp::with_config(config);

    for view in ["a", "b", "c", "d"] {
        common::assert_png(&app.get(&format!("/eink-image?view={view}")).await);
    }

    assert_eq!(app.cache.len(), 2);
}

#[tokio::test]
async fn test_client_giving_up_does_not_stall_other_renders() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png_delayed(
            "/slow",
            fixtures::photo_png(64, 64),
            Duration::from_millis(300),
        )
        .await;
    upstream
        .mock_png("/panel", fixtures::dashboard_png(8, 8))
        .await;
    let mut config = TestApp::config_for(&upstream);
    config.cache.render_workers = 1;
    let app = TestApp::with_config(config);

    let gave_up = tokio::time::timeout(
        Duration::from_millis(50),
        app.get("/eink-image?source_path=/slow"),
    )
    .await;
    assert!(gave_up.is_err());

    let other = tokio::time::timeout(Duration::from_secs(10), app.get("/eink-image"))
        .await
        .expect("render for another key stalled");
    common::assert_png(&other);

    tokio::time::sleep(Duration::from_millis(800)).await;
    let retry = app.get("/eink-image?source_path=/slow").await;
    common::assert_cache(&retry, "hit");
    assert_eq!(upstream.requests_to("/slow").await.len(), 1);
}
