//! Test utilities and common setup.

use std::path::Path;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use dirserve::{AppState, Config, Root, routes};
use tempfile::TempDir;
use tower::ServiceExt;

/// A temporary root directory with an application serving it.
pub struct TestServer {
    pub dir: TempDir,
    pub app: Router,
}

impl TestServer {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Send a GET for `uri` through a fresh clone of the router.
    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .method(Method::GET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Create a test application over the layout used by most tests:
///
/// ```text
/// docs/readme.txt   "hello"
/// docs/images/      (empty)
/// a.txt             "a"
/// b                 "b"
/// .secret           "hidden"
/// ```
pub fn test_server() -> TestServer {
    test_server_with_config(Config::default())
}

pub fn test_server_with_config(config: Config) -> TestServer {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    std::fs::create_dir_all(root.join("docs/images")).unwrap();
    std::fs::write(root.join("docs/readme.txt"), "hello").unwrap();
    std::fs::write(root.join("a.txt"), "a").unwrap();
    std::fs::write(root.join("b"), "b").unwrap();
    std::fs::write(root.join(".secret"), "hidden").unwrap();

    let state = AppState::with_config(Root::new(root).unwrap(), config);
    TestServer {
        app: routes::app(state),
        dir,
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
