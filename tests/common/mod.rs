//! Shared fixtures for pipeline and lifecycle tests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use pipehub::config::ClientConfig;
use pipehub::lifecycle::startup::{BoxError, Runtime};
use pipehub::ShutdownContext;

/// The reference document: one host, one server, one pipe.
#[allow(dead_code)]
pub const SAMPLE: &str = r#"
[[host]]
endpoint = "google"
handler = "base.Default"

[[server]]
graceful-shutdown = "10s"

[[server.http]]
port = 80

[[server.action]]
not-found = "base.NotFound"
panic = "base.Panic"

[[pipe]]
[[pipe."github.com/pipehub/sample"]]
version = "v0.7.0"
alias = "base"
"#;

/// Write `content` to a unique file under the temp dir.
#[allow(dead_code)]
pub fn write_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("pipehub-{}-{}.toml", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

/// What a runtime saw during a test.
#[allow(dead_code)]
#[derive(Default)]
pub struct Recorded {
    pub started: Option<ClientConfig>,
    pub stop_ctx: Option<ShutdownContext>,
}

/// A runtime that records its calls. With `fail_on_start` set it reports an
/// async error right after starting.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct RecordingRuntime {
    pub recorded: Arc<Mutex<Recorded>>,
    pub fail_on_start: bool,
}

impl Runtime for RecordingRuntime {
    async fn start(&mut self, config: ClientConfig) -> Result<(), BoxError> {
        if self.fail_on_start {
            let handler = config.async_error_handler.clone();
            tokio::spawn(async move {
                let err = std::io::Error::new(std::io::ErrorKind::Other, "listener crashed");
                handler(&err);
            });
        }
        self.recorded.lock().unwrap().started = Some(config);
        Ok(())
    }

    async fn stop(&mut self, ctx: ShutdownContext) -> Result<(), BoxError> {
        self.recorded.lock().unwrap().stop_ctx = Some(ctx);
        Ok(())
    }
}
