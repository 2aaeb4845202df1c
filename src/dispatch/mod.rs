//! Dispatch subsystem: method → handler, once the host router has matched.
//!
//! # Data Flow
//! ```text
//! Matched endpoint + method + path params
//!     → dispatcher.rs (ask resource for a handler)
//!     → resource.rs (convention lookup or custom handle)
//!     → Handled / Aborted / Failed(500) / MethodNotAllowed(405)
//! ```

pub mod dispatcher;
pub mod error;
pub mod resource;

pub use dispatcher::{Dispatcher, MethodNotAllowed, Outcome};
pub use error::{redirect, HandlerError};
pub use resource::{handler_name, Call, Handler, HandlerResult, HandlerSet, Resource};
