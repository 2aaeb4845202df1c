//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router from the frozen SchemaRegistry
//! - Mount one route per reachable endpoint URL
//! - Serve the exported schema at the metadata path
//! - Wire up middleware (timeout, request ID, tracing)
//! - Refuse route sets the path router would reject, before mounting
//! - Bind server to listener and shut down gracefully

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderName, HeaderValue, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::api::Api;
use crate::config::RouterConfig;
use crate::dispatch::Call;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::schema::{SCHEMA_VERSION, SCHEMA_VERSION_HEADER};
use crate::routing::{Endpoint, Mount, RouteResult, RouteSet};

/// Which registered endpoint a mounted route dispatches to.
#[derive(Debug, Clone)]
struct Target {
    resource: Arc<str>,
    endpoint: Arc<str>,
}

/// HTTP server for the resource router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server serving `api`.
    ///
    /// Fails if the schema path is not a literal path, or if two templates
    /// bind different param names at the same position.
    pub fn new(config: RouterConfig, api: Arc<Api>) -> RouteResult<Self> {
        let router = Self::build_router(&config, api)?;
        Ok(Self { router, config })
    }

    /// The axum router, for in-process use (e.g. tests).
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, api: Arc<Api>) -> RouteResult<Router> {
        let mut router = Router::new();
        let mut mounted = RouteSet::new();
        mounted.mount_literal(&config.api.schema_path)?;

        for resource in api.registry().resources() {
            // Named endpoints win over the primary URL when paths coincide.
            let endpoints = resource
                .endpoints()
                .iter()
                .chain(std::iter::once(resource.primary()));
            for endpoint in endpoints {
                if !mountable(resource.name(), endpoint) {
                    continue;
                }
                let path = match mounted.mount(endpoint.template()) {
                    Ok(Mount::Added(path)) => path,
                    Ok(Mount::Shadowed(path)) => {
                        tracing::debug!(
                            resource = %resource.name(),
                            endpoint = %endpoint.name(),
                            path = %path,
                            "Path already mounted, skipping"
                        );
                        continue;
                    }
                    Err(e) => {
                        tracing::error!(
                            resource = %resource.name(),
                            endpoint = %endpoint.name(),
                            error = %e,
                            "Route cannot be mounted"
                        );
                        return Err(e);
                    }
                };

                let target = Target {
                    resource: Arc::from(resource.name()),
                    endpoint: Arc::from(endpoint.name()),
                };
                tracing::debug!(
                    resource = %target.resource,
                    endpoint = %target.endpoint,
                    path = %path,
                    "Mounting endpoint"
                );

                let method_router = if endpoint.params().is_empty() {
                    any(move |State(api): State<Arc<Api>>, request: Request<Body>| async move {
                        dispatch_request(api, target, HashMap::new(), request)
                    })
                } else {
                    any(
                        move |State(api): State<Arc<Api>>,
                              Path(params): Path<HashMap<String, String>>,
                              request: Request<Body>| async move {
                            dispatch_request(api, target, params, request)
                        },
                    )
                };
                router = router.route(&path, method_router);
            }
        }

        let timeout = Duration::from_secs(config.timeouts.request_secs);
        Ok(router
            .route(&config.api.schema_path, get(schema_handler))
            .with_state(api)
            .layer(TimeoutLayer::new(timeout))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer()))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// False for the empty sentinel and for templates no path router can match.
fn mountable(resource: &str, endpoint: &Endpoint) -> bool {
    let template = endpoint.template();
    if template.is_empty() {
        return false;
    }
    if !template.is_routable() {
        tracing::warn!(
            resource = %resource,
            endpoint = %endpoint.name(),
            template = %template,
            "Template cannot be mounted on the router, reverse resolution only"
        );
        return false;
    }
    true
}

fn dispatch_request(
    api: Arc<Api>,
    target: Target,
    params: HashMap<String, String>,
    request: Request<Body>,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let request_id = request_id(&request).to_string();

    let call = Call::new(method.clone(), target.endpoint.as_ref(), params, request);
    match api.dispatch(&target.resource, &target.endpoint, call) {
        Ok(outcome) => {
            let label = outcome.label();
            tracing::debug!(
                request_id = %request_id,
                resource = %target.resource,
                endpoint = %target.endpoint,
                method = %method,
                outcome = label,
                "Dispatched"
            );
            metrics::record_dispatch(&target.resource, &target.endpoint, label, start);
            outcome.into_response()
        }
        Err(e) => {
            // Mounted targets always exist in the registry.
            tracing::error!(
                request_id = %request_id,
                error = %e,
                "Dispatch target missing"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, api.config().error.clone()).into_response()
        }
    }
}

async fn schema_handler(State(api): State<Arc<Api>>) -> impl IntoResponse {
    (
        [(
            HeaderName::from_static(SCHEMA_VERSION_HEADER),
            HeaderValue::from(SCHEMA_VERSION),
        )],
        Json(api.export()),
    )
}
