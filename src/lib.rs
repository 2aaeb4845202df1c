//! Declarative resource routing with reverse URL resolution.
//!
//! Resources and their endpoints are registered once into a
//! [`routing::SchemaRegistry`]. The server side mounts them on axum and
//! dispatches each request method to a handler ([`dispatch`]); clients
//! receive the exported [`routing::SerializedSchema`] and rebuild URLs with
//! a [`routing::ReverseResolver`].

pub mod api;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use api::{Api, ApiBuilder};
pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
