//! Handler failures and their HTTP envelopes.

use std::error::Error as StdError;
use std::fmt;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Why a handler did not produce its normal response.
#[derive(Error)]
pub enum HandlerError {
    /// Stop and send this response as-is (e.g. a 400 or a redirect).
    #[error("aborted with status {}", .0.status())]
    Abort(Response),

    /// Unhandled failure; reported as a 500.
    #[error("{0}")]
    Internal(BoxError),
}

impl HandlerError {
    /// Abort with an empty response of the given status.
    pub fn abort(status: StatusCode) -> Self {
        Self::Abort(status.into_response())
    }

    pub fn internal(err: impl Into<BoxError>) -> Self {
        Self::Internal(err.into())
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort(response) => f.debug_tuple("Abort").field(&response.status()).finish(),
            Self::Internal(err) => f.debug_tuple("Internal").field(err).finish(),
        }
    }
}

/// Build a 500 response for an unhandled failure.
///
/// The body always carries `error`; `exception` and `causes` are added only
/// in debug mode.
pub fn internal_error_response(
    message: &str,
    err: &(dyn StdError + 'static),
    debug: bool,
) -> Response {
    let mut body = serde_json::json!({ "error": message });
    if debug {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        body["exception"] = serde_json::Value::String(err.to_string());
        body["causes"] = serde_json::json!(causes);
    }
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Build a redirect response. Only 3xx statuses are accepted.
pub fn redirect(status: StatusCode, location: &str) -> Result<Response, HandlerError> {
    if !status.is_redirection() {
        return Err(HandlerError::internal(format!(
            "redirect requires a 3xx status, got {status}"
        )));
    }
    let location = HeaderValue::from_str(location).map_err(HandlerError::internal)?;
    Ok((status, [(header::LOCATION, location)]).into_response())
}
