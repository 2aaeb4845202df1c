//! Resource handlers and the method naming convention.
//!
//! A resource answers `handle(suffix, call)` with a result, or `None` when it
//! has nothing for the call's method. The default `handle` looks up a handler
//! named `lowercase(method) + suffix`, so `GET` on an endpoint with suffix
//! `_list` runs `get_list`. Resources with other needs override `handle`.

use std::collections::HashMap;
use std::fmt;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;

use crate::dispatch::error::HandlerError;

/// Everything a handler gets about one request.
#[derive(Debug)]
pub struct Call {
    pub method: Method,
    /// Endpoint name; empty for the primary URL.
    pub endpoint: String,
    /// Path params already extracted by the host router.
    pub params: HashMap<String, String>,
    pub request: Request<Body>,
}

impl Call {
    pub fn new(
        method: Method,
        endpoint: impl Into<String>,
        params: HashMap<String, String>,
        request: Request<Body>,
    ) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            params,
            request,
        }
    }

    /// Shorthand for a call whose request is just `method` with an empty body.
    pub fn bare(
        method: Method,
        endpoint: impl Into<String>,
        params: HashMap<String, String>,
    ) -> Self {
        let mut request = Request::new(Body::empty());
        *request.method_mut() = method.clone();
        Self::new(method, endpoint, params, request)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub type HandlerResult = Result<Response, HandlerError>;

pub type Handler = Box<dyn Fn(Call) -> HandlerResult + Send + Sync>;

/// Handler name for `method` under the naming convention.
pub fn handler_name(method: &Method, suffix: Option<&str>) -> String {
    let mut name = method.as_str().to_ascii_lowercase();
    if let Some(suffix) = suffix {
        name.push_str(suffix);
    }
    name
}

/// The capability set a resource offers the dispatcher.
pub trait Resource: Send + Sync {
    /// Look up a handler by convention name.
    fn handler(&self, _name: &str) -> Option<&Handler> {
        None
    }

    /// Run the handler for `call`, or return `None` if there is none.
    fn handle(&self, suffix: Option<&str>, call: Call) -> Option<HandlerResult> {
        let name = handler_name(&call.method, suffix);
        self.handler(&name).map(|handler| handler(call))
    }
}

/// Stock resource: a table of convention-named handlers.
#[derive(Default)]
pub struct HandlerSet {
    handlers: HashMap<String, Handler>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler under `name` (e.g. `get`, `post_list`).
    pub fn on<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Call) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerSet").field("handlers", &names).finish()
    }
}

impl Resource for HandlerSet {
    fn handler(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }
}
