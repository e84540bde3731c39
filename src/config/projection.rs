//! Views of a validated [`Config`] for downstream consumers.
//!
//! - [`GenerateConfig`] feeds the plugin build step
//! - [`ClientConfig`] boots the server runtime
//! - [`ShutdownContext`] bounds how long the runtime may take to stop
//!
//! All projections are pure and may be taken any number of times.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::Config;
use crate::lifecycle::ShutdownContext;

/// Callback invoked by the runtime when a background task fails.
pub type AsyncErrorHandler = Arc<dyn Fn(&(dyn std::error::Error + 'static)) + Send + Sync>;

/// Plugin build configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateConfig {
    pub pipe: Vec<GenerateConfigPipe>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerateConfigPipe {
    pub alias: String,
    pub path: String,
    pub module: String,
    pub version: String,
}

/// Runtime configuration.
#[derive(Clone, Serialize)]
pub struct ClientConfig {
    pub host: Vec<ClientConfigHost>,
    pub server: ClientConfigServer,
    #[serde(skip)]
    pub async_error_handler: AsyncErrorHandler,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("host", &self.host)
            .field("server", &self.server)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientConfigHost {
    pub endpoint: String,
    pub handler: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientConfigServer {
    pub http: ClientConfigServerHttp,
    pub action: ClientConfigServerAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClientConfigServerHttp {
    /// 0 when no `http` block was written.
    pub port: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfigServerAction {
    pub not_found: String,
    pub panic: String,
}

/// The `graceful-shutdown` literal could not be parsed.
#[derive(Debug, Error)]
#[error("parse duration '{raw}' error: {source}")]
pub struct DurationParseError {
    pub raw: String,
    #[source]
    pub source: humantime::DurationError,
}

impl Config {
    pub fn to_generate_config(&self) -> GenerateConfig {
        GenerateConfig {
            pipe: self
                .pipes
                .iter()
                .map(|pipe| GenerateConfigPipe {
                    alias: pipe.alias.clone(),
                    path: pipe.import_path.clone(),
                    module: pipe.module.clone(),
                    version: pipe.version.clone(),
                })
                .collect(),
        }
    }

    /// Build the runtime configuration. The error handler comes from the
    /// caller, never from the document.
    pub fn to_client_config(&self, async_error_handler: AsyncErrorHandler) -> ClientConfig {
        let host = self
            .hosts
            .iter()
            .map(|host| ClientConfigHost {
                endpoint: host.endpoint.clone(),
                handler: host.handler.clone(),
            })
            .collect();

        let mut server = ClientConfigServer::default();
        if let Some(s) = self.server() {
            if let Some(action) = s.action() {
                server.action = ClientConfigServerAction {
                    not_found: action.not_found.clone(),
                    panic: action.panic.clone(),
                };
            }
            if let Some(http) = s.http() {
                server.http = ClientConfigServerHttp { port: http.port };
            }
        }

        ClientConfig {
            host,
            server,
            async_error_handler,
        }
    }

    /// The configured graceful-shutdown window, if any.
    pub fn graceful_shutdown(&self) -> Result<Option<Duration>, DurationParseError> {
        let raw = match self.server() {
            Some(server) if !server.graceful_shutdown.is_empty() => &server.graceful_shutdown,
            _ => return Ok(None),
        };

        humantime::parse_duration(raw)
            .map(Some)
            .map_err(|source| DurationParseError {
                raw: raw.clone(),
                source,
            })
    }

    /// Create the context handed to the runtime's stop call. Without a
    /// graceful-shutdown window it never expires on its own.
    pub fn to_shutdown_context(&self) -> Result<ShutdownContext, DurationParseError> {
        Ok(match self.graceful_shutdown()? {
            Some(window) => ShutdownContext::with_timeout(window),
            None => ShutdownContext::never(),
        })
    }
}
