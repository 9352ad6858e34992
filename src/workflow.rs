//! Upload-then-analyze submission sequence.
//!
//! `Idle -> Uploading -> Analyzing -> (Success | Failed)`. Each in-flight
//! state has one transition, driven by [`Workflow::advance`], which performs
//! exactly one backend call. Failures from either stage are wrapped once in a
//! [`SubmitError`] and turned into `Failed` in a single place.

use crate::{
    backend::{AnalyzeIn, Backend},
    controller::Effect,
    model::{AnalysisResult, StagedFile},
};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Uploading,
    Analyzing,
    Success(AnalysisResult),
    Failed(String),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Failed to upload files: {0}")]
    Upload(String),

    #[error("Failed to analyze documents: {0}")]
    Analyze(String),

    #[error("No relevant sections found in your documents.")]
    NoSections,
}

#[derive(Debug)]
pub struct Workflow {
    phase: Phase,
    request: Option<AnalyzeIn>,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            request: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.phase, Phase::Uploading | Phase::Analyzing)
    }

    /// Enters `Uploading`. The caller has already checked the gate; a call
    /// while a submission is in flight is a no-op.
    pub fn begin(&mut self, request: AnalyzeIn) -> Vec<Effect> {
        if self.in_flight() {
            return Vec::new();
        }
        info!(session_id = %request.session_id, "submission started");
        self.request = Some(request);
        self.phase = Phase::Uploading;
        vec![Effect::RenderResults]
    }

    /// Runs the transition for the current state. Terminal and idle states
    /// produce no effects.
    pub fn advance<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        files: &[StagedFile],
    ) -> Vec<Effect> {
        let outcome = match self.phase {
            Phase::Uploading => self.on_uploading(backend, files).map(|()| Phase::Analyzing),
            Phase::Analyzing => self.on_analyzing(backend).map(Phase::Success),
            _ => return Vec::new(),
        };

        self.phase = match outcome {
            Ok(next) => next,
            Err(err) => {
                warn!("analysis failed: {err}");
                self.request = None;
                Phase::Failed(err.to_string())
            }
        };
        if matches!(self.phase, Phase::Success(_)) {
            self.request = None;
        }
        vec![Effect::RenderResults]
    }

    fn on_uploading<B: Backend + ?Sized>(
        &self,
        backend: &B,
        files: &[StagedFile],
    ) -> Result<(), SubmitError> {
        let session_id = self
            .request
            .as_ref()
            .map(|r| r.session_id.as_str())
            .unwrap_or_default();
        let out = backend
            .upload(session_id, files)
            .map_err(|e| SubmitError::Upload(e.detail("Upload failed")))?;
        info!(
            files = files.len(),
            processed = ?out.files_processed,
            "upload successful"
        );
        Ok(())
    }

    fn on_analyzing<B: Backend + ?Sized>(
        &self,
        backend: &B,
    ) -> Result<AnalysisResult, SubmitError> {
        let request = self
            .request
            .as_ref()
            .ok_or_else(|| SubmitError::Analyze("Analysis failed".to_string()))?;
        let result = backend
            .analyze(request)
            .map_err(|e| SubmitError::Analyze(e.detail("Analysis failed")))?;
        if result.sections.is_empty() {
            return Err(SubmitError::NoSections);
        }
        info!(
            sections = result.sections.len(),
            documents = result.metadata.distinct_documents(),
            "analysis complete"
        );
        Ok(result)
    }

    /// Back to the placeholder. Ignored while a submission is in flight.
    pub fn reset(&mut self) -> Vec<Effect> {
        if self.in_flight() {
            return Vec::new();
        }
        self.phase = Phase::Idle;
        vec![Effect::RenderResults]
    }

    /// Escape: clears a rendered result; any other panel is left alone.
    pub fn dismiss(&mut self) -> Vec<Effect> {
        if matches!(self.phase, Phase::Success(_)) {
            self.phase = Phase::Idle;
            vec![Effect::RenderResults]
        } else {
            Vec::new()
        }
    }
}
