use crate::intake::MIN_FILES;
use serde::Serialize;

/// Trimmed persona and job text must be strictly longer than this.
pub const MIN_TEXT_CHARS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gate {
    pub enabled: bool,
    pub label: String,
}

/// Eligibility of the analyze control. When disabled, the label names the
/// first unmet condition: file count, then persona, then job.
pub fn evaluate(staged: usize, persona: &str, job: &str) -> Gate {
    let has_files = staged >= MIN_FILES;
    let has_persona = text_ok(persona);
    let has_job = text_ok(job);

    let label = if !has_files {
        format!("Need {} more file(s)", MIN_FILES - staged)
    } else if !has_persona {
        "Define persona".to_string()
    } else if !has_job {
        "Define job to be done".to_string()
    } else {
        "Analyze Documents".to_string()
    };

    Gate {
        enabled: has_files && has_persona && has_job,
        label,
    }
}

fn text_ok(s: &str) -> bool {
    s.trim().chars().count() > MIN_TEXT_CHARS
}
