use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failure while serving a request.
///
/// Every variant carries the request path exactly as the client supplied
/// it. Filesystem paths and OS error text never reach the `Display` output,
/// which is what the client sees.
#[derive(Error, Debug)]
pub enum ExploreError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path is outside root directory: {0}")]
    PathTraversal(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Neither a file nor a directory: {0}")]
    UnsupportedEntry(String),

    #[error("IO error while serving: {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExploreError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        ExploreError::Io {
            path: path.into(),
            source,
        }
    }

    /// The request path the error refers to
    pub fn request_path(&self) -> &str {
        match self {
            ExploreError::InvalidPath(path)
            | ExploreError::PathTraversal(path)
            | ExploreError::NotFound(path)
            | ExploreError::UnsupportedEntry(path)
            | ExploreError::Io { path, .. } => path,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ExploreError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ExploreError::PathTraversal(_) => StatusCode::FORBIDDEN,
            ExploreError::NotFound(_) => StatusCode::NOT_FOUND,
            ExploreError::UnsupportedEntry(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ExploreError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ExploreError::InvalidPath(_) => "INVALID_PATH",
            ExploreError::PathTraversal(_) => "PATH_TRAVERSAL",
            ExploreError::NotFound(_) => "NOT_FOUND",
            ExploreError::UnsupportedEntry(_) => "UNSUPPORTED_ENTRY",
            ExploreError::Io { .. } => "IO_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: String,
    code: &'static str,
    path: &'a str,
}

impl IntoResponse for ExploreError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
            path: self.request_path(),
        };

        (self.status(), Json(body)).into_response()
    }
}
