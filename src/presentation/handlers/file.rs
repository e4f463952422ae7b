use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

use super::movie::AppState;

/// Uploaded files are untrusted; scripts inside them (e.g. SVG) must not run
const POSTER_CSP: &str = "default-src 'none'; img-src 'self'; style-src 'unsafe-inline'; sandbox";
use crate::{infrastructure::storage::FileStorage, presentation::middleware::error::AppError};

/// Stream a stored poster back to the client
pub async fn serve_poster(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let metadata = state.storage.metadata(&file_name).await?;
    let reader = state.storage.retrieve(&file_name).await?;

    tracing::debug!(poster = %file_name, size = metadata.size, "Serving poster");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, metadata.content_type)
        .header(header::CONTENT_LENGTH, metadata.size)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(header::CONTENT_SECURITY_POLICY, POSTER_CSP)
        .body(Body::from_stream(ReaderStream::new(reader)))
        .map_err(|e| AppError::Internal { message: format!("Response build failed: {e}") })
}
