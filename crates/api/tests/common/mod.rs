//! Shared helpers for API integration tests.
//!
//! Builds the full application router against temporary data-store and
//! module directories, with fake GRASS executables standing in for a real
//! installation.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use grassd_api::config::ServerConfig;
use grassd_api::router::build_app_router;
use grassd_api::state::AppState;
use grassd_core::config::GrassConfig;

/// Fake launcher: creates the location directory named after `-e`.
const LAUNCHER: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
  if [ "$1" = "-e" ]; then
    shift
    mkdir -p "$1"
  fi
  shift
done
exit 0
"#;

/// A test service wired to throwaway directories.
pub struct TestEnv {
    pub app: Router,
    pub dbase: TempDir,
    pub modules: TempDir,
    bin: TempDir,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
    }
}

/// Build the full application router against temp directories.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_env() -> TestEnv {
    let dbase = tempfile::tempdir().expect("dbase");
    let modules = tempfile::tempdir().expect("modules");
    let bin = tempfile::tempdir().expect("bin");

    install_script(bin.path(), "grass70", LAUNCHER);

    let grass_config = GrassConfig::new(
        Some(bin.path().join("grass70")),
        Some(dbase.path().to_path_buf()),
        modules.path().to_path_buf(),
        None,
    )
    .expect("grass config");

    let app = build_app_router(AppState::new(grass_config), &test_config());

    TestEnv {
        app,
        dbase,
        modules,
        bin,
    }
}

/// Write an executable script into `dir`.
pub fn install_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

/// Install a fake module that answers `--interface-description` with `xml`
/// and otherwise exits 0.
pub fn install_module(dir: &Path, name: &str, xml: &str) {
    let body = format!(
        "#!/bin/sh\nif [ \"$1\" = \"--interface-description\" ]; then\ncat <<'EOF'\n{xml}EOF\nfi\nexit 0\n"
    );
    install_script(dir, name, &body);
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("JSON body")
}
