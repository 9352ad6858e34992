pub mod http;
pub mod types;

use crate::model::{AnalysisResult, StagedFile};
use thiserror::Error;

pub use types::{AnalyzeIn, HealthOut, UploadOut};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{0}")]
    Transport(String),

    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Status { status: u16, message: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// Text shown to the user for this failure. Server-reported messages win;
    /// a non-2xx without one falls back to `fallback`.
    pub fn detail(&self, fallback: &str) -> String {
        match self {
            BackendError::Transport(msg) | BackendError::Decode(msg) => msg.clone(),
            BackendError::Status { message, .. } => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(fallback)
                .to_string(),
        }
    }
}

/// The analysis service as seen by the client workflow.
pub trait Backend {
    fn upload(&self, session_id: &str, files: &[StagedFile]) -> Result<UploadOut, BackendError>;
    fn analyze(&self, req: &AnalyzeIn) -> Result<AnalysisResult, BackendError>;
    fn health(&self) -> Result<HealthOut, BackendError>;
    fn cleanup(&self, session_id: &str) -> Result<(), BackendError>;
}

/// Healthy iff the service answers with `status == "healthy"`; any failure
/// counts as unhealthy.
pub fn check_health<B: Backend + ?Sized>(backend: &B) -> bool {
    match backend.health() {
        Ok(h) => {
            tracing::info!(status = %h.status, "api health");
            h.is_healthy()
        }
        Err(err) => {
            tracing::warn!("health check failed: {err}");
            false
        }
    }
}

/// Best-effort release of server-side session resources.
pub fn cleanup_session<B: Backend + ?Sized>(backend: &B, session_id: &str) {
    match backend.cleanup(session_id) {
        Ok(()) => tracing::info!(session_id, "session cleaned up"),
        Err(err) => tracing::warn!(session_id, "cleanup failed: {err}"),
    }
}
