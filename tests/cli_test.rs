//! Tests for the command-line entry points.

mod common;

use common::{fixtures, MockUpstream};
use tokio::process::Command;

fn cli() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_eink-proxy"));
    command.env_remove("SOURCE_URL").env_remove("RUST_LOG");
    command
}

#[tokio::test]
async fn test_render_writes_panel_png() {
    let upstream = MockUpstream::start().await;
    upstream
        .mock_png("/panel", fixtures::photo_png(24, 18))
        .await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panel.png");

    let result = cli()
        .arg("--source-url")
        .arg(upstream.url_for("/panel"))
        .arg("render")
        .arg("--output")
        .arg(&output)
        .arg("--dither")
        .arg("true")
        .output()
        .await
        .unwrap();

    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let written = image::open(&output).unwrap().to_rgb8();
    assert_eq!(written.dimensions(), (24, 18));
    assert!(written
        .pixels()
        .all(|p| fixtures::PANEL_COLORS.contains(&p.0)));
}

#[tokio::test]
async fn test_render_fails_on_upstream_error() {
    let upstream = MockUpstream::start().await;
    upstream.mock_status("/panel", 404, 1).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("panel.png");

    let result = cli()
        .arg("--source-url")
        .arg(upstream.url_for("/panel"))
        .arg("render")
        .arg("--output")
        .arg(&output)
        .output()
        .await
        .unwrap();

    assert!(!result.status.success());
    assert!(!output.exists());
}

#[tokio::test]
async fn test_status_prints_configuration() {
    let result = cli()
        .arg("--source-url")
        .arg("http://dashboard.local:8123/panel")
        .arg("--cache-ttl")
        .arg("7")
        .output()
        .await
        .unwrap();

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("http://dashboard.local:8123/panel"));
    assert!(stdout.contains("CACHE_TTL"));
    assert!(stdout.contains("Configuration is valid."));
}
