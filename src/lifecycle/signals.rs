//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT/SIGTERM (ctrl-c elsewhere)
//! - Treat a cancelled `done` context the same as a signal
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - A failure to install the handler is logged and only `done` is awaited

use crate::lifecycle::ShutdownContext;

/// Why the process is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Signal,
    Done,
}

/// Resolve when a termination signal arrives or `done` is cancelled.
pub async fn wait_for_stop(done: &ShutdownContext) -> StopReason {
    tokio::select! {
        _ = terminate() => {
            tracing::info!("Termination signal received");
            StopReason::Signal
        }
        _ = done.cancelled() => StopReason::Done,
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGTERM handler");
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {}
        _ = ctrl_c() => {}
    }
}

#[cfg(not(unix))]
async fn terminate() {
    ctrl_c().await
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install SIGINT handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_done_stops_waiting() {
        let done = ShutdownContext::never();
        let trigger = done.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let reason = tokio::time::timeout(Duration::from_secs(1), wait_for_stop(&done))
            .await
            .expect("done should stop the wait");
        assert_eq!(reason, StopReason::Done);
    }
}
