//! Mapping of crate errors onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tracing::{error, warn};

use super::pages;
use crate::error::{Error, ErrorKind};

/// Status code a failed request of this kind is answered with.
#[must_use]
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::TooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Storage | ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());
        // Server-side detail (paths, io errors) stays in the log
        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "The report could not be processed. Please try again later.".to_string()
        } else {
            warn!(error = %self, "Request rejected");
            self.to_string()
        };
        (status, Html(pages::error_page(status, &message))).into_response()
    }
}
