//! Local liveness responder.
//!
//! `/health` is answered by the gateway itself and says only that the
//! process is accepting connections. Backend availability is discovered by
//! real calls failing, never by this endpoint.
//!
//! [`readiness`] is the client side: polling a gateway until it answers.

pub mod readiness;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// `200 OK` with a plaintext `OK` body.
pub fn local_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        "OK",
    )
        .into_response()
}
