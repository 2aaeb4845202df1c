//! Routing subsystem: declarative schema and reverse URL resolution.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     ResourceDef[]
//!     → registry.rs (parse templates, reject duplicates)
//!     → Freeze as immutable SchemaRegistry
//!     → schema.rs (export SerializedSchema for clients)
//!
//! Reverse resolution (client side):
//!     SerializedSchema
//!     → reverse.rs (compile snapshot)
//!     → resolve("resource:endpoint", args)
//!     → template.rs (render)
//!     → concrete URL or RouteError
//! ```
//!
//! # Design Decisions
//! - Registry is built once and never mutated while serving
//! - Path matching belongs to the host router; this module only describes
//!   the paths and renders them back
//! - Every failure is a typed, synchronous error; nothing here logs

pub mod error;
pub mod mount;
pub mod registry;
pub mod reverse;
pub mod schema;
pub mod template;

pub use error::{RouteError, RouteResult};
pub use mount::{Mount, RouteSet};
pub use registry::{Endpoint, EndpointDef, RegisteredResource, ResourceDef, SchemaRegistry};
pub use reverse::{Args, ReverseResolver};
pub use schema::{EndpointSchema, ResourceSchema, SerializedSchema, SCHEMA_VERSION};
pub use template::UrlTemplate;
