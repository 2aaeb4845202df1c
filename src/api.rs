//! Composition root: the frozen registry plus the resources that serve it.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::response::IntoResponse;

use crate::config::ApiConfig;
use crate::dispatch::{handler_name, Call, Dispatcher, HandlerSet, Outcome, Resource};
use crate::routing::registry::parse_methods;
use crate::routing::{
    ResourceDef, ReverseResolver, RouteError, RouteResult, SchemaRegistry, SerializedSchema,
};

/// A built API. Immutable; share it behind an `Arc`.
pub struct Api {
    config: ApiConfig,
    registry: Arc<SchemaRegistry>,
    resources: HashMap<String, Arc<dyn Resource>>,
    dispatcher: Dispatcher,
    schema: SerializedSchema,
}

impl Api {
    pub fn builder(config: ApiConfig) -> ApiBuilder {
        ApiBuilder {
            config,
            registry: SchemaRegistry::new(),
            resources: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// The schema snapshot handed to clients.
    pub fn export(&self) -> SerializedSchema {
        self.schema.clone()
    }

    /// A client-side resolver over a fresh snapshot.
    pub fn resolver(&self) -> RouteResult<ReverseResolver> {
        ReverseResolver::from_schema(&self.schema)
    }

    /// Dispatch `call` to `resource`'s endpoint (empty name for the primary URL).
    pub fn dispatch(&self, resource: &str, endpoint: &str, call: Call) -> RouteResult<Outcome> {
        let registered = self.registry.resource(resource)?;
        let endpoint = if endpoint.is_empty() {
            registered.primary()
        } else {
            registered.endpoint(endpoint)?
        };
        let handlers = self
            .resources
            .get(resource)
            .ok_or_else(|| RouteError::UnknownResource(resource.to_string()))?;
        Ok(self.dispatcher.dispatch(handlers.as_ref(), endpoint, call))
    }
}

/// Collects registrations during startup.
pub struct ApiBuilder {
    config: ApiConfig,
    registry: SchemaRegistry,
    resources: HashMap<String, Arc<dyn Resource>>,
}

impl ApiBuilder {
    /// Register `def` and the resource serving it.
    pub fn resource(
        mut self,
        def: &ResourceDef,
        resource: impl Resource + 'static,
    ) -> RouteResult<Self> {
        self.registry.register(def)?;
        self.resources.insert(def.name.clone(), Arc::new(resource));
        Ok(self)
    }

    pub fn build(self) -> Api {
        let schema = self.registry.export();
        Api {
            dispatcher: Dispatcher::new(self.config.clone()),
            config: self.config,
            registry: Arc::new(self.registry),
            resources: self.resources,
            schema,
        }
    }
}

/// A resource that answers every declared method by echoing the call as JSON.
///
/// Used for resources declared only in configuration.
pub fn echo_resource(def: &ResourceDef) -> RouteResult<HandlerSet> {
    let mut set = HandlerSet::new();
    let primary = std::iter::once((&def.allow, None));
    let endpoints = def.endpoints.iter().map(|e| (&e.allow, e.suffix.as_deref()));

    for (allow, suffix) in primary.chain(endpoints) {
        for method in parse_methods(allow)? {
            let name = handler_name(&method, suffix);
            if set.contains(&name) {
                continue;
            }
            let resource = def.name.clone();
            set = set.on(name, move |call: Call| {
                let body = serde_json::json!({
                    "resource": resource,
                    "endpoint": call.endpoint,
                    "method": call.method.as_str(),
                    "params": call.params,
                });
                Ok(Json(body).into_response())
            });
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Args, EndpointDef};
    use axum::http::{Method, StatusCode};

    fn def() -> ResourceDef {
        ResourceDef::new("resource")
            .url("/api/v1/resource/")
            .endpoint(
                EndpointDef::new("single", "/api/v1/resource/:id/")
                    .allow(["GET", "PUT", "DELETE"]),
            )
            .endpoint(
                EndpointDef::new("list", "/api/v1/resource/")
                    .allow(["POST", "DELETE", "GET"])
                    .suffix("_list"),
            )
    }

    #[test]
    fn duplicate_registration_fails_fast() {
        let result = Api::builder(ApiConfig::default())
            .resource(&def(), HandlerSet::new())
            .and_then(|b| b.resource(&def(), HandlerSet::new()));
        assert!(matches!(result, Err(RouteError::DuplicateResource(_))));
    }

    #[test]
    fn resolver_matches_registry() {
        let api = Api::builder(ApiConfig::default())
            .resource(&def(), HandlerSet::new())
            .unwrap()
            .build();
        let resolver = api.resolver().unwrap();
        assert_eq!(
            resolver.reverse("resource:single", &Args::positional([5])).unwrap(),
            "/api/v1/resource/5/"
        );
        assert_eq!(api.export(), api.registry().export());
    }

    #[test]
    fn dispatch_unknown_targets() {
        let api = Api::builder(ApiConfig::default())
            .resource(&def(), HandlerSet::new())
            .unwrap()
            .build();
        let call = || Call::bare(Method::GET, "x", HashMap::new());
        assert!(matches!(api.dispatch("bogus", "", call()), Err(RouteError::UnknownResource(_))));
        assert!(matches!(
            api.dispatch("resource", "bogus", call()),
            Err(RouteError::UnknownEndpoint { .. })
        ));
    }

    #[test]
    fn echo_answers_declared_methods_only() {
        let d = def();
        let api = Api::builder(ApiConfig::default())
            .resource(&d, echo_resource(&d).unwrap())
            .unwrap()
            .build();

        let params = HashMap::from([("id".to_string(), "1".to_string())]);
        let outcome = api
            .dispatch("resource", "single", Call::bare(Method::PUT, "single", params))
            .unwrap();
        assert_eq!(outcome.label(), "handled");

        let outcome = api
            .dispatch("resource", "list", Call::bare(Method::PUT, "list", HashMap::new()))
            .unwrap();
        assert_eq!(outcome.label(), "method_not_allowed");

        let outcome = api
            .dispatch("resource", "list", Call::bare(Method::POST, "list", HashMap::new()))
            .unwrap();
        assert_eq!(outcome.into_response().status(), StatusCode::OK);
    }
}
