use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::ExploreError;
use crate::inspector::{FileContent, Inspection};
use crate::resolver::ResolvedPath;

/// GET /{*path} - File contents or directory listing
///
/// The URI path is percent-decoded before resolution, so `%2e%2e` is a
/// parent reference like any other and gets the same treatment.
pub async fn explore(State(state): State<AppState>, uri: Uri) -> Result<Response, ExploreError> {
    let raw = uri.path();
    let request_path = urlencoding::decode(raw).map_err(|_| {
        warn!("Request path is not valid UTF-8 after decoding: {:?}", raw);
        ExploreError::InvalidPath(raw.to_string())
    })?;

    let resolved = state.resolver.resolve(&request_path)?;

    match state.inspector.inspect(&resolved).await? {
        Inspection::File(content) => Ok(file_response(&resolved, content)),
        Inspection::Directory(entries) => {
            debug!("Listed {} entries for {}", entries.len(), resolved.normalized());
            Ok(Json(entries).into_response())
        }
    }
}

fn file_response(resolved: &ResolvedPath, content: FileContent) -> Response {
    let mime = mime_guess::from_path(resolved.fs_path())
        .first_or_octet_stream()
        .to_string();

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_LENGTH, content.len().to_string()),
        ],
        content.into_bytes(),
    )
        .into_response()
}
