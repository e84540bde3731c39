//! Startup orchestration.
//!
//! # Responsibilities
//! - Project the validated configuration for the runtime
//! - Start the runtime and wait for a stop request
//! - Stop the runtime within the configured graceful-shutdown window
//!
//! # Design Decisions
//! - Fail fast: a bad graceful-shutdown literal aborts before the runtime starts
//! - Async runtime errors cancel an explicit `done` context instead of a
//!   process-wide channel

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::projection::{AsyncErrorHandler, ClientConfig};
use crate::config::Config;
use crate::lifecycle::signals::{wait_for_stop, StopReason};
use crate::lifecycle::ShutdownContext;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The server runtime that consumes [`ClientConfig`].
pub trait Runtime {
    fn start(&mut self, config: ClientConfig) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Stop serving. Implementations should give up once `ctx` is cancelled.
    fn stop(&mut self, ctx: ShutdownContext) -> impl Future<Output = Result<(), BoxError>> + Send;
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("start runtime error: {0}")]
    Start(#[source] BoxError),

    #[error("stop runtime error: {0}")]
    Stop(#[source] BoxError),

    #[error("graceful shutdown window elapsed before the runtime stopped")]
    StopTimeout,
}

/// Build the handler the runtime calls on background failures.
///
/// The error is logged and `done` is cancelled, which ends [`serve`]'s wait.
pub fn async_error_handler(done: ShutdownContext) -> AsyncErrorHandler {
    Arc::new(move |err: &(dyn std::error::Error + 'static)| {
        tracing::error!(error = %err, "async error occurred");
        done.cancel();
    })
}

/// Run `runtime` until a signal arrives or `done` is cancelled, then stop it.
pub async fn serve<R: Runtime>(
    config: &Config,
    runtime: &mut R,
    done: ShutdownContext,
) -> Result<StopReason, StartupError> {
    let window = config.graceful_shutdown().map_err(ConfigError::from)?;
    let client = config.to_client_config(async_error_handler(done.clone()));

    tracing::info!(
        hosts = client.host.len(),
        port = client.server.http.port,
        "Starting runtime"
    );
    runtime.start(client).await.map_err(StartupError::Start)?;

    let reason = wait_for_stop(&done).await;
    tracing::info!(reason = ?reason, graceful_shutdown = ?window, "Stopping runtime");

    // The deadline starts counting here, not at startup.
    let ctx = config.to_shutdown_context().map_err(ConfigError::from)?;

    tokio::select! {
        result = runtime.stop(ctx.clone()) => result.map_err(StartupError::Stop)?,
        _ = ctx.cancelled() => return Err(StartupError::StopTimeout),
    }

    tracing::info!("Shutdown complete");
    Ok(reason)
}
