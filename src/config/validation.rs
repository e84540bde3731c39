//! Configuration validation.
//!
//! # Responsibilities
//! - Enforce block cardinality: one `server`, one `server.http`, one
//!   `server.action`
//!
//! # Design Decisions
//! - Stops at the first violation, checked in a fixed order
//! - Validation is pure function: Config → Result<(), ValidationError>
//! - `host` and `pipe` may appear any number of times

use thiserror::Error;

use crate::config::schema::{Config, ServerConfig};

/// A cardinality rule was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("more than one '{block}' config block found ({count}), only one is allowed")]
    DuplicateBlock { block: &'static str, count: usize },
}

impl ValidationError {
    /// Dotted name of the offending block.
    pub fn block(&self) -> &'static str {
        match self {
            ValidationError::DuplicateBlock { block, .. } => block,
        }
    }
}

/// Validate a decoded configuration.
pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    at_most_one("server", config.servers.len())?;
    config.servers.iter().try_for_each(validate_server)
}

fn validate_server(server: &ServerConfig) -> Result<(), ValidationError> {
    at_most_one("server.http", server.http.len())?;
    at_most_one("server.action", server.action.len())
}

fn at_most_one(block: &'static str, count: usize) -> Result<(), ValidationError> {
    if count > 1 {
        return Err(ValidationError::DuplicateBlock { block, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ActionConfig, HostConfig, HttpConfig, PipeConfig};

    #[test]
    fn test_empty_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_hosts_and_pipes_unbounded() {
        let config = Config {
            hosts: vec![HostConfig::default(); 5],
            pipes: vec![PipeConfig::default(); 3],
            servers: vec![ServerConfig::default()],
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_two_servers() {
        let config = Config {
            servers: vec![ServerConfig::default(), ServerConfig::default()],
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.block(), "server");
        assert!(err.to_string().contains("'server'"));
    }

    #[test]
    fn test_two_http_blocks() {
        let config = Config {
            servers: vec![ServerConfig {
                http: vec![HttpConfig { port: 80 }, HttpConfig { port: 81 }],
                ..ServerConfig::default()
            }],
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert_eq!(err.block(), "server.http");
    }

    #[test]
    fn test_server_count_checked_first() {
        let bad_server = ServerConfig {
            http: vec![HttpConfig::default(); 2],
            action: vec![ActionConfig::default(); 2],
            ..ServerConfig::default()
        };
        let config = Config {
            servers: vec![bad_server.clone(), bad_server.clone()],
            ..Config::default()
        };
        assert_eq!(validate_config(&config).unwrap_err().block(), "server");

        let config = Config {
            servers: vec![bad_server],
            ..Config::default()
        };
        assert_eq!(validate_config(&config).unwrap_err().block(), "server.http");
    }

    #[test]
    fn test_two_action_blocks() {
        let config = Config {
            servers: vec![ServerConfig {
                action: vec![ActionConfig::default(), ActionConfig::default()],
                ..ServerConfig::default()
            }],
            ..Config::default()
        };
        assert_eq!(validate_config(&config).unwrap_err().block(), "server.action");
    }
}
