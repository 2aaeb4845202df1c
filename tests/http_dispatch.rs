//! End-to-end dispatch through the axum router, in process.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use resource_router::config::{ApiConfig, RouterConfig};
use resource_router::lifecycle::startup::build_api;
use resource_router::routing::{Args, ResourceDef, ReverseResolver, RouteError, SerializedSchema};
use resource_router::HttpServer;
use tower::ServiceExt;

mod common;

fn router(api_config: ApiConfig) -> Router {
    let mut config = RouterConfig::default();
    config.api = api_config.clone();
    HttpServer::new(config, common::api(api_config))
        .unwrap()
        .router()
}

async fn send(router: Router, method: Method, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

async fn json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn post_without_handler_is_405_in_declared_order() {
    let response = send(router(ApiConfig::default()), Method::POST, "/api/v1/resource/1/").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "GET, PUT, DELETE");
}

#[tokio::test]
async fn list_405_keeps_unsorted_order() {
    let response = send(router(ApiConfig::default()), Method::PUT, "/api/v1/resource/").await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[header::ALLOW], "POST, DELETE, GET");
}

#[tokio::test]
async fn get_reaches_handler_with_path_params() {
    let response = send(router(ApiConfig::default()), Method::GET, "/api/v1/resource/42/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert_eq!(body["endpoint"], "single");
    assert_eq!(body["method"], "GET");
    assert_eq!(body["params"]["id"], "42");
}

#[tokio::test]
async fn suffix_routes_list_and_set() {
    let router = router(ApiConfig::default());

    let response = send(router.clone(), Method::POST, "/api/v1/resource/").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json(send(router, Method::GET, "/api/v1/resource/set/1;2/").await).await;
    assert_eq!(body["endpoint"], "set");
    assert_eq!(body["params"]["idset"], "1;2");
}

#[tokio::test]
async fn abort_and_failure_envelopes() {
    let response = send(router(ApiConfig::default()), Method::DELETE, "/api/v1/resource/0/").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let boom = "/api/v1/resource/boom/";
    let response = send(router(ApiConfig::default()), Method::DELETE, boom).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(response).await;
    assert_eq!(body, serde_json::json!({ "error": "Internal Server Error" }));

    let debug = ApiConfig {
        debug: true,
        error: "custom error message".into(),
        ..ApiConfig::default()
    };
    let body = json(send(router(debug), Method::DELETE, boom).await).await;
    assert_eq!(body["error"], "custom error message");
    assert_eq!(body["exception"], "storage unavailable");
}

#[tokio::test]
async fn unmounted_path_is_404() {
    let response = send(router(ApiConfig::default()), Method::GET, "/api/v2/other/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schema_route_serves_export() {
    let response = send(router(ApiConfig::default()), Method::GET, "/schema").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-schema-version"], "1");
    assert!(response.headers().contains_key("x-request-id"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let schema: SerializedSchema = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(schema, common::api(ApiConfig::default()).export());
    assert_eq!(schema.resources["nourl"].endpoint["list"].url, "");
    assert_eq!(
        schema.resources["resource"].endpoint["list"].allow,
        ["POST", "DELETE", "GET"]
    );
}

#[tokio::test]
async fn incoming_request_id_is_echoed() {
    let request = Request::builder()
        .uri("/schema")
        .header("x-request-id", "req-123")
        .body(Body::empty())
        .unwrap();
    let response = router(ApiConfig::default()).oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

#[tokio::test]
async fn resolved_urls_reach_the_resolved_endpoint() {
    let router = router(ApiConfig::default());
    let body = json(send(router.clone(), Method::GET, "/schema").await).await;
    let schema: SerializedSchema = serde_json::from_value(body).unwrap();
    let resolver = ReverseResolver::from_schema(&schema).unwrap();

    let url = resolver.reverse("resource:single", &Args::named([("id", 9)])).unwrap();
    let body = json(send(router, Method::GET, &url).await).await;
    assert_eq!(body["endpoint"], "single");
    assert_eq!(body["params"]["id"], "9");
}

#[test]
fn renamed_params_on_one_path_fail_instead_of_panicking() {
    let mut config = RouterConfig::default();
    config.resources = vec![
        ResourceDef::new("by_id").url("/api/:id/"),
        ResourceDef::new("by_pk").url("/api/:pk/"),
    ];
    let api = Arc::new(build_api(&config).unwrap());

    let err = HttpServer::new(config, api).err().expect("conflict is reported");
    assert_eq!(
        err,
        RouteError::RouteConflict {
            path: "/api/{pk}/".into(),
            existing: "/api/{id}/".into(),
        }
    );
}

#[test]
fn placeholder_schema_path_fails_instead_of_panicking() {
    for schema_path in ["/:meta", "/{meta}"] {
        let mut config = RouterConfig::default();
        config.api.schema_path = schema_path.into();
        let api = Arc::new(build_api(&config).unwrap());

        let result = HttpServer::new(config, api);
        assert!(
            matches!(result, Err(RouteError::Template { .. })),
            "{schema_path} should be rejected"
        );
    }
}
