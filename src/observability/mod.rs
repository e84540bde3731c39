//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing` fields
//! - Subscriber is installed by the binary, never by the library

pub mod logging;
