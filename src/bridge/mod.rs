//! Process bridge subsystem.
//!
//! # Data Flow
//! ```text
//! InvocationSpec (built per request by the HTTP layer)
//!     → executor.rs (acquire worker permit, spawn, feed stdin)
//!     → drain stdout + stderr concurrently, wait for exit (under deadline)
//!     → InvocationResult (exit state + both buffers)
//!     → completion contract: exit 0 → stdout, otherwise BridgeError
//! ```
//!
//! # Design Decisions
//! - One OS process per invocation; nothing is pooled or reused
//! - Arguments are argv elements, never a shell string
//! - A semaphore bounds simultaneous workers; excess callers queue
//! - Every invocation has a deadline; expiry kills the child
//! - No knowledge of HTTP or of what the workers fetch

pub mod error;
pub mod executor;
pub mod invocation;

pub use error::{BridgeError, BridgeResult};
pub use executor::ProcessBridge;
pub use invocation::{ExitState, InvocationResult, InvocationSpec, WorkerCommand};
