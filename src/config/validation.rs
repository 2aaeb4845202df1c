//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, paths absolute)
//! - Check declared resources compile into a registry
//! - Check the HTTP routes those resources produce can all be mounted
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::registry::parse_methods;
use crate::routing::{ResourceDef, RouteError, RouteSet, UrlTemplate};

/// A single semantic problem in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("api.schema_path must start with '/': {0:?}")]
    RelativeSchemaPath(String),

    #[error("observability.metrics_address is not a socket address: {0:?}")]
    InvalidMetricsAddress(String),

    #[error("resource at index {0} has an empty name")]
    EmptyResourceName(usize),

    #[error("endpoint at index {index} of resource {resource} has an empty name")]
    EmptyEndpointName { resource: String, index: usize },

    #[error("{0}")]
    Schema(RouteError),
}

/// Check a parsed config, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if !config.api.schema_path.starts_with('/') {
        errors.push(ValidationError::RelativeSchemaPath(config.api.schema_path.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let mut names = HashSet::new();
    for (index, resource) in config.resources.iter().enumerate() {
        if resource.name.is_empty() {
            errors.push(ValidationError::EmptyResourceName(index));
        } else if !names.insert(resource.name.as_str()) {
            errors.push(ValidationError::Schema(RouteError::DuplicateResource(
                resource.name.clone(),
            )));
        }

        check_url(&resource.url, &mut errors);
        check_methods(&resource.allow, &mut errors);

        let mut endpoint_names = HashSet::new();
        for (index, endpoint) in resource.endpoints.iter().enumerate() {
            if endpoint.name.is_empty() {
                errors.push(ValidationError::EmptyEndpointName {
                    resource: resource.name.clone(),
                    index,
                });
            } else if !endpoint_names.insert(endpoint.name.as_str()) {
                errors.push(ValidationError::Schema(RouteError::DuplicateEndpoint {
                    resource: resource.name.clone(),
                    endpoint: endpoint.name.clone(),
                }));
            }
            check_url(&endpoint.url, &mut errors);
            check_methods(&endpoint.allow, &mut errors);
        }
    }

    check_routes(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(url: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = UrlTemplate::parse(url) {
        errors.push(ValidationError::Schema(e));
    }
}

/// Offer every mountable URL to a [`RouteSet`] the way the HTTP server
/// does: schema path first, then each resource's endpoints before its
/// primary URL.
fn check_routes(config: &RouterConfig, errors: &mut Vec<ValidationError>) {
    let mut routes = RouteSet::new();
    if config.api.schema_path.starts_with('/') {
        if let Err(e) = routes.mount_literal(&config.api.schema_path) {
            errors.push(ValidationError::Schema(e));
        }
    }

    for resource in &config.resources {
        for url in mounted_urls(resource) {
            let Ok(template) = UrlTemplate::parse(url) else {
                continue;
            };
            if template.is_empty() || !template.is_routable() {
                continue;
            }
            if let Err(e) = routes.mount(&template) {
                errors.push(ValidationError::Schema(e));
            }
        }
    }
}

fn mounted_urls(resource: &ResourceDef) -> impl Iterator<Item = &str> {
    resource
        .endpoints
        .iter()
        .map(|e| e.url.as_str())
        .chain(std::iter::once(resource.url.as_str()))
}

fn check_methods(methods: &[String], errors: &mut Vec<ValidationError>) {
    if let Err(e) = parse_methods(methods) {
        errors.push(ValidationError::Schema(e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::EndpointDef;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&RouterConfig::default()), Ok(()));
    }

    #[test]
    fn collects_every_error() {
        let mut config = RouterConfig::default();
        config.listener.bind_address = String::new();
        config.timeouts.request_secs = 0;
        config.api.schema_path = "schema".into();
        config.resources = vec![
            ResourceDef::new("r")
                .url("/r/{id")
                .endpoint(EndpointDef::new("a", "/a/").allow(["G E T"]))
                .endpoint(EndpointDef::new("a", "/b/"))
                .endpoint(EndpointDef::new("", "/c/")),
            ResourceDef::new("r"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 8);
        assert!(errors.contains(&ValidationError::EmptyBindAddress));
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
        let schema = |e: RouteError| ValidationError::Schema(e);
        assert!(errors.contains(&schema(RouteError::DuplicateResource("r".into()))));
        assert!(errors.contains(&schema(RouteError::InvalidMethod("G E T".into()))));
        assert!(errors.contains(&ValidationError::EmptyEndpointName {
            resource: "r".into(),
            index: 2,
        }));
    }

    #[test]
    fn renamed_params_on_one_path_are_a_route_conflict() {
        let mut config = RouterConfig::default();
        config.resources = vec![
            ResourceDef::new("a").url("/api/:id/"),
            ResourceDef::new("b").url("/api/:pk/"),
        ];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Schema(RouteError::RouteConflict {
                path: "/api/{pk}/".into(),
                existing: "/api/{id}/".into(),
            })]
        );
    }

    #[test]
    fn shared_identical_paths_are_not_a_conflict() {
        let mut config = RouterConfig::default();
        config.resources = vec![
            ResourceDef::new("a")
                .url("/api/")
                .endpoint(EndpointDef::new("single", "/api/:id/")),
            ResourceDef::new("b").url("/api/{id}/"),
        ];
        assert_eq!(validate_config(&config), Ok(()));
    }

    #[test]
    fn schema_path_must_be_literal() {
        for path in ["/:meta", "/{meta}", "/meta/{id"] {
            let mut config = RouterConfig::default();
            config.api.schema_path = path.into();
            let errors = validate_config(&config).unwrap_err();
            assert!(
                matches!(errors[..], [ValidationError::Schema(RouteError::Template { .. })]),
                "{path}: {errors:?}"
            );
        }
    }

    #[test]
    fn metrics_address_checked_only_when_enabled() {
        let mut config = RouterConfig::default();
        config.observability.metrics_address = "not-an-address".into();
        assert_eq!(validate_config(&config), Ok(()));

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidMetricsAddress(
                "not-an-address".into()
            )])
        );
    }
}
