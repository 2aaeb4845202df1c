//! HTTP hosting subsystem (axum).
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum router built from the SchemaRegistry)
//!     → request.rs (request ID)
//!     → axum path matching (extracts path params)
//!     → Api::dispatch → handler / 405 / 500
//!     → Send to client
//!
//! GET {schema_path}
//!     → exported SerializedSchema as JSON
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
