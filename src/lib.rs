//! pipehub configuration and bootstrap library.

pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::{load_config, Config, ConfigError};
pub use lifecycle::ShutdownContext;
