//! eink-proxy
//!
//! Fetches dashboard snapshots from an upstream renderer and serves them
//! converted for seven-colour e-ink panels.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
