//! Application state and event dispatch.
//!
//! `App` owns everything the client mutates. Every operation mutates the
//! state in place and returns the [`Effect`]s a front end must apply; no
//! operation renders anything itself.

use crate::{
    backend::{AnalyzeIn, Backend},
    draft::{self, Debounce, DraftStore},
    gate::{self, Gate},
    intake::StagedFiles,
    model::{Draft, IncomingFile, Session},
    samples,
    workflow::{Phase, Workflow},
};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const DRAFT_QUIET_PERIOD: Duration = Duration::from_millis(1000);
pub const DRAFT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Success,
    Error,
}

/// Transient banner; a new one replaces the previous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RenderFileList,
    RenderGate,
    RenderInputs,
    RenderResults,
    Status(Status),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Ctrl/Cmd + Enter.
    ModEnter,
    Escape,
}

#[derive(Debug, Clone)]
pub enum Event {
    Drop(Vec<IncomingFile>),
    Pick(Vec<IncomingFile>),
    Remove(usize),
    PersonaInput(String),
    JobInput(String),
    LoadSample(String),
    Key(Key),
    AnalyzeClicked,
    ResetClicked,
}

pub struct App {
    session: Session,
    files: StagedFiles,
    persona: String,
    job: String,
    workflow: Workflow,
    status: Option<Status>,
    draft_timer: Debounce,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self::with_quiet_period(session, DRAFT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(session: Session, quiet: Duration) -> Self {
        Self {
            session,
            files: StagedFiles::new(),
            persona: String::new(),
            job: String::new(),
            workflow: Workflow::new(),
            status: None,
            draft_timer: Debounce::new(quiet),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn files(&self) -> &StagedFiles {
        &self.files
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn phase(&self) -> &Phase {
        self.workflow.phase()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.workflow.in_flight()
    }

    pub fn gate(&self) -> Gate {
        gate::evaluate(self.files.len(), &self.persona, &self.job)
    }

    pub fn dispatch(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        let effects = match event {
            Event::Drop(batch) | Event::Pick(batch) => self.files.add_files(batch),
            Event::Remove(index) => self.files.remove_file(index),
            Event::PersonaInput(text) => {
                self.persona = text;
                self.draft_timer.touch(now);
                vec![Effect::RenderGate, Effect::RenderInputs]
            }
            Event::JobInput(text) => {
                self.job = text;
                self.draft_timer.touch(now);
                vec![Effect::RenderGate, Effect::RenderInputs]
            }
            Event::LoadSample(name) => self.load_sample(&name),
            Event::Key(Key::ModEnter) | Event::AnalyzeClicked => self.submit(),
            Event::Key(Key::Escape) => self.workflow.dismiss(),
            Event::ResetClicked => self.workflow.reset(),
        };
        self.note_status(&effects);
        effects
    }

    /// Starts a submission when the gate allows it; otherwise a no-op.
    fn submit(&mut self) -> Vec<Effect> {
        let gate = self.gate();
        if !gate.enabled {
            debug!(label = %gate.label, "analyze ignored; gate closed");
            return Vec::new();
        }
        self.workflow.begin(AnalyzeIn {
            persona: self.persona.trim().to_string(),
            job_to_be_done: self.job.trim().to_string(),
            session_id: self.session.id().to_string(),
        })
    }

    /// One network step of an in-flight submission.
    pub fn advance<B: Backend + ?Sized>(&mut self, backend: &B) -> Vec<Effect> {
        self.workflow.advance(backend, self.files.as_slice())
    }

    fn load_sample(&mut self, name: &str) -> Vec<Effect> {
        let Some(sample) = samples::find(name) else {
            debug!(name, "unknown sample");
            return Vec::new();
        };
        self.persona = sample.persona.to_string();
        self.job = sample.job.to_string();
        vec![
            Effect::RenderInputs,
            Effect::RenderGate,
            Effect::Status(Status::success(format!("Loaded {name} example"))),
        ]
    }

    pub fn report_health(&mut self, healthy: bool) -> Vec<Effect> {
        if healthy {
            info!("backend connection healthy");
            return Vec::new();
        }
        warn!("API health check failed");
        let effects = vec![Effect::Status(Status::error(
            "Connection to backend may be unstable",
        ))];
        self.note_status(&effects);
        effects
    }

    /// Restores a draft younger than `max_age` into the text inputs.
    pub fn restore_draft(
        &mut self,
        store: &dyn DraftStore,
        now_millis: i64,
        max_age: Duration,
    ) -> Vec<Effect> {
        let Some(d) = draft::load_restorable(store, now_millis, max_age) else {
            return Vec::new();
        };
        self.persona = d.persona;
        self.job = d.job_to_be_done;
        let mut effects = vec![Effect::RenderInputs, Effect::RenderGate];
        if !self.persona.is_empty() || !self.job.is_empty() {
            effects.push(Effect::Status(Status::success(
                "Draft restored from previous session",
            )));
        }
        self.note_status(&effects);
        effects
    }

    /// Saves the draft once the quiet period after the last edit has passed.
    /// Returns whether a save was attempted.
    pub fn poll_draft(&mut self, now: Instant, store: &dyn DraftStore, now_millis: i64) -> bool {
        if !self.draft_timer.fire(now) {
            return false;
        }
        draft::save_quietly(store, &self.draft(now_millis));
        true
    }

    /// Saves a pending draft without waiting for the quiet period.
    pub fn flush_draft(&mut self, store: &dyn DraftStore, now_millis: i64) -> bool {
        if !self.draft_timer.take() {
            return false;
        }
        draft::save_quietly(store, &self.draft(now_millis));
        true
    }

    fn draft(&self, now_millis: i64) -> Draft {
        Draft {
            persona: self.persona.clone(),
            job_to_be_done: self.job.clone(),
            timestamp: now_millis,
        }
    }

    fn note_status(&mut self, effects: &[Effect]) {
        if let Some(status) = effects.iter().rev().find_map(|e| match e {
            Effect::Status(s) => Some(s),
            _ => None,
        }) {
            self.status = Some(status.clone());
        }
    }
}
