//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (CORS preflight, response hardening headers)
//!     → limits.rs (reject oversized bodies before they are buffered)
//!     → handlers, which pass user values to workers as argv/stdin data only
//! ```
//!
//! # Design Decisions
//! - No caller authentication; the service is meant to sit behind the frontend
//! - Worker input is never interpolated into code or a shell command line

pub mod headers;
pub mod limits;
