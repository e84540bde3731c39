//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → ClientConfig → Runtime::start
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT or async runtime error → Runtime::stop(ShutdownContext)
//! ```
//!
//! # Design Decisions
//! - Shutdown has timeout: the `graceful-shutdown` window bounds the stop call
//! - No process-wide state; the `done` context is passed explicitly

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::ShutdownContext;
