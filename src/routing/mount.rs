//! Bookkeeping for templates mounted on a path router.
//!
//! A path router refuses two routes that bind different param names at the
//! same position (`/api/{id}/` next to `/api/{pk}/`), and refuses literal
//! paths that look like placeholders. [`RouteSet`] finds both before any
//! route reaches the router, so the host can report them instead of
//! panicking at startup.

use std::collections::HashMap;

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::template::UrlTemplate;

/// Result of offering a template to a [`RouteSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mount {
    /// New path; mount it under this route path.
    Added(String),
    /// The exact route path is already mounted.
    Shadowed(String),
}

/// Route paths accepted so far, with the param name bound at each position.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    paths: Vec<String>,
    /// Normalized prefix (params as `{}`) → (param name, owning route path).
    params: HashMap<String, (String, String)>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a routable template.
    ///
    /// Fails with [`RouteError::RouteConflict`] if a mounted path binds a
    /// different param name at the same position. Nothing is recorded on
    /// failure.
    pub fn mount(&mut self, template: &UrlTemplate) -> RouteResult<Mount> {
        let path = template.to_route_path();
        if self.paths.contains(&path) {
            return Ok(Mount::Shadowed(path));
        }

        let bindings = param_positions(&path);
        for (prefix, name) in &bindings {
            if let Some((bound, existing)) = self.params.get(prefix) {
                if bound != name {
                    return Err(RouteError::RouteConflict {
                        path,
                        existing: existing.clone(),
                    });
                }
            }
        }

        for (prefix, name) in bindings {
            self.params
                .entry(prefix)
                .or_insert_with(|| (name, path.clone()));
        }
        self.paths.push(path.clone());
        Ok(Mount::Added(path))
    }

    /// Offer a fixed path such as the schema route.
    ///
    /// The path must start with `/` and contain no placeholders.
    pub fn mount_literal(&mut self, path: &str) -> RouteResult<Mount> {
        let template = UrlTemplate::parse(path)?;
        if !path.starts_with('/') || !template.params().is_empty() {
            return Err(RouteError::Template {
                pattern: path.to_string(),
                reason: "expected an absolute path without placeholders".into(),
            });
        }
        self.mount(&template)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// `(normalized prefix, name)` for every `{name}` segment of `path`.
fn param_positions(path: &str) -> Vec<(String, String)> {
    let mut prefix = String::new();
    let mut out = Vec::new();
    for (i, segment) in path.split('/').enumerate() {
        if i > 0 {
            prefix.push('/');
        }
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                out.push((prefix.clone(), name.to_string()));
                prefix.push_str("{}");
            }
            None => prefix.push_str(segment),
        }
    }
    out
}
