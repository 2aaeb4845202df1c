//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use resource_router::config::ApiConfig;
use resource_router::dispatch::{Call, HandlerError, HandlerResult, HandlerSet};
use resource_router::routing::{EndpointDef, ResourceDef, ReverseResolver};
use resource_router::Api;

/// `resource` with `single`, `set` and `list`; primary URL at the list path.
pub fn resource_def() -> ResourceDef {
    ResourceDef::new("resource")
        .url("/api/v1/resource/")
        .endpoint(
            EndpointDef::new("single", "/api/v1/resource/:id/").allow(["GET", "PUT", "DELETE"]),
        )
        .endpoint(
            EndpointDef::new("set", "/api/v1/resource/set/:idset/")
                .allow(["GET"])
                .suffix("_set"),
        )
        .endpoint(
            EndpointDef::new("list", "/api/v1/resource/")
                .allow(["POST", "DELETE", "GET"])
                .suffix("_list"),
        )
}

/// `nourl` whose only endpoint has no reachable URL.
pub fn nourl_def() -> ResourceDef {
    ResourceDef::new("nourl").endpoint(EndpointDef::new("list", ""))
}

fn echo(call: Call) -> HandlerResult {
    Ok(Json(serde_json::json!({
        "endpoint": call.endpoint,
        "method": call.method.as_str(),
        "params": call.params,
    }))
    .into_response())
}

/// Handlers for `resource`: no `post`, so POST on `single` is a 405.
pub fn resource_handlers() -> HandlerSet {
    HandlerSet::new()
        .on("get", echo)
        .on("put", echo)
        .on("get_set", echo)
        .on("get_list", echo)
        .on("post_list", |call: Call| {
            if call.param("fail").is_some() {
                return Err(HandlerError::internal("unreachable"));
            }
            Ok((StatusCode::CREATED, "created").into_response())
        })
        .on("delete", |call: Call| match call.param("id") {
            Some("0") => Err(HandlerError::abort(StatusCode::BAD_REQUEST)),
            Some("boom") => Err(HandlerError::internal("storage unavailable")),
            _ => Ok(StatusCode::NO_CONTENT.into_response()),
        })
}

pub fn api(config: ApiConfig) -> Arc<Api> {
    let api = Api::builder(config)
        .resource(&resource_def(), resource_handlers())
        .and_then(|b| b.resource(&nourl_def(), HandlerSet::new()))
        .expect("fixture schema registers");
    Arc::new(api.build())
}

/// A resolver built from a JSON round trip, as a remote client would.
pub fn resolver() -> ReverseResolver {
    let json = api(ApiConfig::default()).export().to_json().unwrap();
    let schema = resource_router::routing::SerializedSchema::from_json(&json).unwrap();
    ReverseResolver::from_schema(&schema).unwrap()
}
