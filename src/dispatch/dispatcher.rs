//! Method-level dispatch for an already matched endpoint.
//!
//! # Responsibilities
//! - Ask the resource to handle the call under the endpoint's suffix
//! - Turn "no handler" into a 405 carrying the endpoint's `Allow` list
//! - Turn unhandled handler failures into a uniform 500
//!
//! # Design Decisions
//! - Stateless apart from the failure settings; safe to share
//! - `Allow` keeps declaration order, it is not sorted

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::ApiConfig;
use crate::dispatch::error::{internal_error_response, HandlerError};
use crate::dispatch::resource::{Call, Resource};
use crate::routing::Endpoint;

/// The "no handler for this method" result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNotAllowed {
    allow: Vec<Method>,
}

impl MethodNotAllowed {
    pub fn new(allow: Vec<Method>) -> Self {
        Self { allow }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::METHOD_NOT_ALLOWED
    }

    /// Declared methods joined by `", "`.
    pub fn allow_header(&self) -> String {
        self.allow
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl IntoResponse for MethodNotAllowed {
    fn into_response(self) -> Response {
        // Method tokens are always valid header characters.
        let allow = HeaderValue::from_str(&self.allow_header())
            .unwrap_or_else(|_| HeaderValue::from_static(""));
        (self.status(), [(header::ALLOW, allow)]).into_response()
    }
}

/// What happened to a dispatched call.
#[derive(Debug)]
pub enum Outcome {
    /// The handler returned normally.
    Handled(Response),
    /// The handler aborted with its own response.
    Aborted(Response),
    /// The handler failed; this is the 500 response.
    Failed(Response),
    /// No handler exists for the method.
    MethodNotAllowed(MethodNotAllowed),
}

impl Outcome {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Handled(_) => "handled",
            Self::Aborted(_) => "aborted",
            Self::Failed(_) => "error",
            Self::MethodNotAllowed(_) => "method_not_allowed",
        }
    }
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Handled(response) | Self::Aborted(response) | Self::Failed(response) => response,
            Self::MethodNotAllowed(not_allowed) => not_allowed.into_response(),
        }
    }
}

/// Resolves and invokes handlers.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    config: ApiConfig,
}

impl Dispatcher {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn dispatch(&self, resource: &dyn Resource, endpoint: &Endpoint, call: Call) -> Outcome {
        let method = call.method.clone();
        match resource.handle(endpoint.suffix(), call) {
            None => Outcome::MethodNotAllowed(MethodNotAllowed::new(endpoint.allow().to_vec())),
            Some(Ok(response)) => Outcome::Handled(response),
            Some(Err(HandlerError::Abort(response))) => Outcome::Aborted(response),
            Some(Err(HandlerError::Internal(err))) => {
                tracing::error!(
                    endpoint = %endpoint.name(),
                    method = %method,
                    error = %err,
                    "{}", self.config.error
                );
                Outcome::Failed(internal_error_response(
                    &self.config.error,
                    &*err,
                    self.config.debug,
                ))
            }
        }
    }
}
