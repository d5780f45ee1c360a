//! Assertion helpers for tests.

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use super::app::TestResponse;
use super::fixtures::PANEL_COLORS;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status,
        expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert response is a PNG with the PNG content type
pub fn assert_png(response: &TestResponse) {
    assert_ok(response);
    assert!(
        response.is_png(),
        "Expected PNG image, got {} bytes starting with {:?}",
        response.body.len(),
        &response.body[..8.min(response.body.len())]
    );
    assert_eq!(response.header("content-type"), Some("image/png"));
}

/// Assert every pixel of a PNG response is one of the seven panel colours
pub fn assert_panel_colors_only(response: &TestResponse) {
    assert_png(response);
    let img = response.decode_rgb();
    for (x, y, pixel) in img.enumerate_pixels() {
        assert!(
            PANEL_COLORS.contains(&pixel.0),
            "Pixel ({x}, {y}) = {:?} is not a panel colour",
            pixel.0
        );
    }
}

/// Assert the standard JSON error body
pub fn assert_json_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(json["status"].as_u64(), Some(expected.as_u16() as u64));
    assert!(json["error"].is_string(), "Expected error message: {json}");
}

/// Assert which way the render cache served the request
pub fn assert_cache(response: &TestResponse, expected: &str) {
    assert_eq!(response.header("x-render-cache"), Some(expected));
}
