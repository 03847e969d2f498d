//! Status and diagnostic output.

use tracing::{error, info};

/// Receives progress and diagnostic messages. Fire-and-forget.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
    fn success(&self, message: &str);
    fn error(&self, message: &str);

    /// Report an error value.
    fn error_source(&self, err: &dyn std::error::Error) {
        self.error(&err.to_string());
    }
}

/// Forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn status(&self, message: &str) {
        info!(kind = "status", "{message}");
    }

    fn success(&self, message: &str) {
        info!(kind = "success", "{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}
