//! Schema registry: the single store of resources and their endpoints.
//!
//! # Lifecycle
//! Built once during startup through [`SchemaRegistry::register`], then
//! frozen behind an `Arc` and only read. Nothing here mutates per request,
//! so lookups need no locking.

use std::collections::BTreeMap;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::routing::error::{RouteError, RouteResult};
use crate::routing::schema::{EndpointSchema, ResourceSchema, SerializedSchema};
use crate::routing::template::UrlTemplate;

/// Registration input for one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct EndpointDef {
    /// Endpoint name, unique within its resource.
    pub name: String,

    /// URL pattern; empty for "no reachable URL".
    #[serde(default)]
    pub url: String,

    /// Allowed methods in declaration order (reported in `Allow`).
    #[serde(default)]
    pub allow: Vec<String>,

    /// Handler-name suffix used by the dispatch convention (e.g. `_list`).
    #[serde(default)]
    pub suffix: Option<String>,
}

impl EndpointDef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn allow<I, M>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.allow = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }
}

/// Registration input for one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceDef {
    /// Resource name, unique within the registry.
    pub name: String,

    /// Primary URL pattern, addressed by the bare resource name.
    #[serde(default)]
    pub url: String,

    /// Methods reported for the primary URL.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Named endpoints in declaration order.
    #[serde(default)]
    pub endpoints: Vec<EndpointDef>,
}

impl ResourceDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn allow<I, M>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.allow = methods.into_iter().map(Into::into).collect();
        self
    }

    pub fn endpoint(mut self, endpoint: EndpointDef) -> Self {
        self.endpoints.push(endpoint);
        self
    }
}

/// A compiled endpoint. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    name: String,
    template: UrlTemplate,
    allow: Vec<Method>,
    suffix: Option<String>,
}

impl Endpoint {
    fn compile(name: &str, url: &str, allow: &[String], suffix: Option<&str>) -> RouteResult<Self> {
        Ok(Self {
            name: name.to_string(),
            template: UrlTemplate::parse(url)?,
            allow: parse_methods(allow)?,
            suffix: suffix.map(str::to_string),
        })
    }

    /// Endpoint name; empty for a resource's primary endpoint.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    pub fn params(&self) -> &[String] {
        self.template.params()
    }

    /// Allowed methods in declaration order.
    pub fn allow(&self) -> &[Method] {
        &self.allow
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    fn export(&self) -> EndpointSchema {
        EndpointSchema {
            url: self.template.as_str().to_string(),
            params: self.params().to_vec(),
            allow: self.allow.iter().map(|m| m.as_str().to_string()).collect(),
        }
    }
}

/// A registered resource: an optional primary URL plus named endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredResource {
    name: String,
    primary: Endpoint,
    endpoints: Vec<Endpoint>,
}

impl RegisteredResource {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The endpoint addressed by the bare resource name. Its template is
    /// the empty sentinel when the resource has no primary URL.
    pub fn primary(&self) -> &Endpoint {
        &self.primary
    }

    /// Named endpoints in declaration order.
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn endpoint(&self, name: &str) -> RouteResult<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| RouteError::UnknownEndpoint {
                resource: self.name.clone(),
                endpoint: name.to_string(),
            })
    }
}

/// Mapping of resource name to resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    resources: BTreeMap<String, RegisteredResource>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and insert a resource. Nothing is inserted on error.
    pub fn register(&mut self, def: &ResourceDef) -> RouteResult<()> {
        if self.resources.contains_key(&def.name) {
            return Err(RouteError::DuplicateResource(def.name.clone()));
        }

        let primary = Endpoint::compile("", &def.url, &def.allow, None)?;
        let mut endpoints: Vec<Endpoint> = Vec::with_capacity(def.endpoints.len());
        for endpoint in &def.endpoints {
            if endpoints.iter().any(|e| e.name == endpoint.name) {
                return Err(RouteError::DuplicateEndpoint {
                    resource: def.name.clone(),
                    endpoint: endpoint.name.clone(),
                });
            }
            endpoints.push(Endpoint::compile(
                &endpoint.name,
                &endpoint.url,
                &endpoint.allow,
                endpoint.suffix.as_deref(),
            )?);
        }

        self.resources.insert(
            def.name.clone(),
            RegisteredResource {
                name: def.name.clone(),
                primary,
                endpoints,
            },
        );
        Ok(())
    }

    pub fn resource(&self, name: &str) -> RouteResult<&RegisteredResource> {
        self.resources
            .get(name)
            .ok_or_else(|| RouteError::UnknownResource(name.to_string()))
    }

    pub fn endpoint(&self, resource: &str, endpoint: &str) -> RouteResult<&Endpoint> {
        self.resource(resource)?.endpoint(endpoint)
    }

    /// Resources ordered by name.
    pub fn resources(&self) -> impl Iterator<Item = &RegisteredResource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Deep snapshot for clients. Stable across calls.
    pub fn export(&self) -> SerializedSchema {
        let resources = self
            .resources
            .values()
            .map(|resource| {
                let endpoint = resource
                    .endpoints
                    .iter()
                    .map(|e| (e.name.clone(), e.export()))
                    .collect();
                let schema = ResourceSchema {
                    url: resource.primary.template.as_str().to_string(),
                    endpoint,
                };
                (resource.name.clone(), schema)
            })
            .collect();
        SerializedSchema { resources }
    }

    /// Rebuild a registry from a snapshot received from a server.
    ///
    /// Each endpoint's `params` must equal the params parsed from its `url`.
    pub fn from_schema(schema: &SerializedSchema) -> RouteResult<Self> {
        let mut registry = Self::new();
        for (name, resource) in &schema.resources {
            let mut def = ResourceDef::new(name.as_str()).url(resource.url.as_str());
            for (endpoint_name, endpoint) in &resource.endpoint {
                let template = UrlTemplate::parse(&endpoint.url)?;
                if template.params() != endpoint.params.as_slice() {
                    return Err(RouteError::Template {
                        pattern: endpoint.url.clone(),
                        reason: format!(
                            "declared params {:?} do not match template params {:?}",
                            endpoint.params,
                            template.params()
                        ),
                    });
                }
                def = def.endpoint(
                    EndpointDef::new(endpoint_name.as_str(), endpoint.url.as_str())
                        .allow(endpoint.allow.iter().cloned()),
                );
            }
            registry.register(&def)?;
        }
        Ok(registry)
    }
}

/// Parse method names, keeping declaration order.
pub fn parse_methods(names: &[String]) -> RouteResult<Vec<Method>> {
    names
        .iter()
        .map(|name| {
            Method::from_bytes(name.to_ascii_uppercase().as_bytes())
                .map_err(|_| RouteError::InvalidMethod(name.clone()))
        })
        .collect()
}
