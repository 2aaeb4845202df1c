//! Startup orchestration.
//!
//! # Responsibilities
//! - Register every resource declared in configuration
//! - Freeze the registry into an `Api`
//! - Log a registration summary
//!
//! # Design Decisions
//! - Fail fast: any registration error is fatal
//! - Config-declared resources answer with the echo handler set

use crate::api::{echo_resource, Api};
use crate::config::RouterConfig;
use crate::routing::RouteResult;

/// Build the `Api` for the resources declared in `config`.
pub fn build_api(config: &RouterConfig) -> RouteResult<Api> {
    let mut builder = Api::builder(config.api.clone());
    for def in &config.resources {
        builder = builder.resource(def, echo_resource(def)?)?;
    }
    let api = builder.build();

    for resource in api.registry().resources() {
        tracing::info!(
            resource = %resource.name(),
            url = %resource.primary().template(),
            endpoints = resource.endpoints().len(),
            "Resource registered"
        );
    }
    Ok(api)
}
