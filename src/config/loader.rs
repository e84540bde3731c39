//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::document::{parse_document, DocumentError};
use crate::config::node::GenericNode;
use crate::config::pipe::decode_pipes;
use crate::config::projection::DurationParseError;
use crate::config::schema::{decode_schema, Config, DecodeError};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("load file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unmarshal payload error: {0}")]
    Document(#[from] DocumentError),

    #[error("unmarshal error: {0}")]
    Decode(#[source] DecodeError),

    #[error("unmarshal pipe config error: {0}")]
    Pipe(#[source] DecodeError),

    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Duration(#[from] DurationParseError),
}

/// Decode a parsed document into a [`Config`], pipes included.
///
/// The tree is decoded twice: once by field name for everything but `pipe`,
/// then the raw `pipe` node is decoded with its labels recovered.
pub fn decode_config(root: &GenericNode) -> Result<Config, ConfigError> {
    let mut config = decode_schema(root).map_err(ConfigError::Decode)?;

    let raw_pipes = match root {
        GenericNode::Mapping(mapping) => mapping.get("pipe"),
        _ => None,
    };
    config.pipes = decode_pipes(raw_pipes).map_err(ConfigError::Pipe)?;

    Ok(config)
}

/// Parse, decode and validate configuration text.
pub fn load_config_str(content: &str) -> Result<Config, ConfigError> {
    let root = parse_document(content)?;
    let config = decode_config(&root)?;

    validate_config(&config)?;

    tracing::debug!(
        hosts = config.hosts.len(),
        pipes = config.pipes.len(),
        servers = config.servers.len(),
        "Configuration decoded"
    );
    Ok(config)
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = load_config_str(&content)?;

    tracing::info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}
