//! Typed failures raised by the routing core.
//!
//! All of these are programmer or configuration errors: none are retryable,
//! and the core never logs or recovers from them.

use thiserror::Error;

/// Errors raised by template parsing, registration and reverse resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A resource with this name is already registered.
    #[error("duplicate resource: {0}")]
    DuplicateResource(String),

    /// An endpoint name appears twice within one resource.
    #[error("duplicate endpoint {endpoint} in resource {resource}")]
    DuplicateEndpoint { resource: String, endpoint: String },

    /// The key names a resource that is not registered.
    #[error("unknown resource: {0}")]
    UnknownResource(String),

    /// The resource exists but has no endpoint with this name.
    #[error("unknown endpoint {endpoint} in resource {resource}")]
    UnknownEndpoint { resource: String, endpoint: String },

    /// The target template is the empty "no URL" sentinel.
    #[error("no url for {0}")]
    NoUrl(String),

    /// No lookup key was supplied.
    #[error("missing resource key")]
    MissingResource,

    /// Positional value count does not equal the declared param count.
    #[error("expected {expected} params, got {actual}")]
    ParamCount { expected: usize, actual: usize },

    /// A declared param is absent from the supplied mapping.
    #[error("missing param: {0}")]
    MissingParam(String),

    /// A duplicated placeholder received two different values.
    #[error("conflicting values for param {name}: {first:?} and {second:?}")]
    ConflictingParam {
        name: String,
        first: String,
        second: String,
    },

    /// An allowed-method entry is not a valid HTTP method token.
    #[error("invalid http method: {0:?}")]
    InvalidMethod(String),

    /// Two templates bind different param names at the same path position,
    /// which a path router cannot tell apart.
    #[error("route {path} conflicts with already mounted {existing}")]
    RouteConflict { path: String, existing: String },

    /// The pattern could not be parsed.
    #[error("malformed template {pattern:?}: {reason}")]
    Template { pattern: String, reason: String },
}

/// Result type for routing operations.
pub type RouteResult<T> = Result<T, RouteError>;
