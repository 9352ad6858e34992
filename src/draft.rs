use crate::{model::Draft, util::ensure_dir};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Fixed name of the single draft slot.
pub const DRAFT_KEY: &str = "documentIntelligence_draft";

pub trait DraftStore {
    fn load(&self) -> Result<Option<Draft>>;
    fn save(&self, draft: &Draft) -> Result<()>;
}

/// Draft slot kept as `<dir>/documentIntelligence_draft.json`.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{DRAFT_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self) -> Result<Option<Draft>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading draft: {}", self.path.display()))?;
        let draft = serde_json::from_str(&raw)
            .with_context(|| format!("parsing draft: {}", self.path.display()))?;
        Ok(Some(draft))
    }

    fn save(&self, draft: &Draft) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let raw = serde_json::to_string(draft)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing draft: {}", self.path.display()))
    }
}

/// Writes the draft; failures are logged and swallowed.
pub fn save_quietly(store: &dyn DraftStore, draft: &Draft) {
    match store.save(draft) {
        Ok(()) => debug!("draft saved"),
        Err(err) => warn!("failed to save draft: {err:#}"),
    }
}

/// Returns the stored draft when it is younger than `max_age`. Stale drafts
/// stay in the slot untouched. Load failures are logged and yield `None`.
pub fn load_restorable(store: &dyn DraftStore, now_millis: i64, max_age: Duration) -> Option<Draft> {
    let draft = match store.load() {
        Ok(Some(d)) => d,
        Ok(None) => return None,
        Err(err) => {
            warn!("failed to load draft: {err:#}");
            return None;
        }
    };
    let Some(age) = now_millis.checked_sub(draft.timestamp) else {
        warn!(timestamp = draft.timestamp, "ignoring draft with out-of-range timestamp");
        return None;
    };
    if age < max_age.as_millis() as i64 {
        Some(draft)
    } else {
        debug!(age_ms = age, "ignoring stale draft");
        None
    }
}

/// Quiet-period timer. Every `touch` pushes the deadline out; `fire` reports
/// expiry once.
#[derive(Debug, Clone)]
pub struct Debounce {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Disarms and reports whether a save was pending.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
