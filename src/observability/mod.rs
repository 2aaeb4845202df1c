//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Hosting layer produces:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dispatch counters)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The routing core never logs; only the HTTP layer and dispatcher do
//! - Metrics are cheap (atomic increments) and off by default

pub mod logging;
pub mod metrics;
