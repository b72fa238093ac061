//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (origin policy, preflight)
//!     → limits.rs (request size, timeout)
//!     → Pass to routing
//!         → static_files.rs (hidden paths under the static mount)
//! ```
//!
//! File and folder names are sanitized in `upload::naming` and `upload::store`.

pub mod cors;
pub mod limits;
pub mod static_files;

pub use cors::cors_layer;
pub use limits::apply_limits;
pub use static_files::hide_dotfiles;
