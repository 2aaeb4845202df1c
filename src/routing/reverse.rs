//! Reverse resolution: rebuild a concrete URL from a key and param values.
//!
//! # Addressing
//! - `"resource"` targets the resource's primary URL
//! - `"resource:endpoint"` targets a named endpoint
//!
//! # Argument policy
//! Positional values must match the param count exactly. Named values must
//! cover every declared param; unknown extra keys are ignored.

use std::collections::HashMap;
use std::fmt;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::registry::{Endpoint, SchemaRegistry};
use crate::routing::schema::SerializedSchema;

/// Param values for a resolve call: positional or named, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Args {
    Positional(Vec<String>),
    Named(HashMap<String, String>),
}

impl Args {
    /// No values at all (an empty positional list).
    pub fn none() -> Self {
        Self::Positional(Vec::new())
    }

    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: fmt::Display,
    {
        Self::Positional(values.into_iter().map(|v| v.to_string()).collect())
    }

    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        Self::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

impl Default for Args {
    fn default() -> Self {
        Self::none()
    }
}

/// Client-side resolver over a schema snapshot.
///
/// Holds its own compiled copy of the schema, so it never observes later
/// changes on the server side.
#[derive(Debug, Clone)]
pub struct ReverseResolver {
    registry: SchemaRegistry,
}

impl ReverseResolver {
    /// Compile a snapshot received from the server.
    pub fn from_schema(schema: &SerializedSchema) -> RouteResult<Self> {
        Ok(Self {
            registry: SchemaRegistry::from_schema(schema)?,
        })
    }

    /// Resolve `key` with `args` into a URL.
    ///
    /// A missing or empty key fails with [`RouteError::MissingResource`].
    pub fn resolve(&self, key: Option<&str>, args: &Args) -> RouteResult<String> {
        let key = match key {
            Some(key) if !key.is_empty() => key,
            _ => return Err(RouteError::MissingResource),
        };

        let endpoint = self.target(key)?;
        let template = endpoint.template();
        if template.is_empty() {
            return Err(RouteError::NoUrl(key.to_string()));
        }

        match args {
            Args::Positional(values) => {
                if values.len() != template.params().len() {
                    return Err(RouteError::ParamCount {
                        expected: template.params().len(),
                        actual: values.len(),
                    });
                }
                template.render(values)
            }
            Args::Named(map) => {
                let values = template
                    .params()
                    .iter()
                    .map(|name| {
                        map.get(name)
                            .ok_or_else(|| RouteError::MissingParam(name.clone()))
                    })
                    .collect::<RouteResult<Vec<_>>>()?;
                template.render(&values)
            }
        }
    }

    /// Shorthand for [`resolve`](Self::resolve) with a key present.
    pub fn reverse(&self, key: &str, args: &Args) -> RouteResult<String> {
        self.resolve(Some(key), args)
    }

    fn target(&self, key: &str) -> RouteResult<&Endpoint> {
        let (resource, endpoint) = match key.split_once(':') {
            Some((resource, endpoint)) => (resource, Some(endpoint)),
            None => (key, None),
        };

        let resource = self.registry.resource(resource)?;
        match endpoint {
            Some(name) => resource.endpoint(name),
            None => Ok(resource.primary()),
        }
    }
}
