//! Locally generated responses.
//!
//! Fixed plain-text bodies; existing clients match on them.
//! Nothing here carries backend detail.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// `404 Not Found` for unroutable paths.
pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/plain")],
        "Not Found",
    )
        .into_response()
}

/// Generic `500` used for every upstream failure.
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain")],
        "Internal Server Error",
    )
        .into_response()
}
