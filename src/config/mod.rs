//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → document.rs (text → GenericNode)
//!     → schema.rs (field-name decode: host, server)
//!     → pipe.rs (label-recovering decode: pipe)
//!     → validation.rs (cardinality checks)
//!     → Config (validated, immutable)
//!     → projection.rs (GenerateConfig, ClientConfig, ShutdownContext)
//! ```
//!
//! # Design Decisions
//! - Config is decoded once at startup and never mutated
//! - Unknown top-level keys are ignored, unknown pipe options are rejected
//! - Validation stops at the first violated rule

pub mod document;
pub mod loader;
pub mod node;
pub mod pipe;
pub mod projection;
pub mod schema;
pub mod validation;

pub use loader::{decode_config, load_config, load_config_str, ConfigError};
pub use node::GenericNode;
pub use projection::{ClientConfig, GenerateConfig};
pub use schema::Config;
pub use schema::{ActionConfig, HostConfig, HttpConfig, PipeConfig, ServerConfig};
