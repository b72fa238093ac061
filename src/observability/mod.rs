//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer and upload handler produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → tracing.rs (request spans with correlation IDs)
//!
//! Consumers:
//!     → Log aggregation (stdout, text or JSON)
//!     → Metrics endpoint (Prometheus scrape, off by default)
//! ```

pub mod logging;
pub mod metrics;
pub mod tracing;
