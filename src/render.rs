//! Pure projections of client state, plus their terminal formatting.

use crate::{
    controller::{App, Status, StatusKind},
    gate::Gate,
    intake::StagedFiles,
    model::AnalysisResult,
    util::format_file_size,
    workflow::Phase,
};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

pub const DEFAULT_ANALYSIS_TYPE: &str = "AI-powered semantic analysis";
pub const LOADING_TITLE: &str = "Preparing Analysis...";
pub const PLACEHOLDER_HINT: &str = "Upload your PDF documents, define your persona and job requirements, then click \"Analyze Documents\" to see intelligent section prioritization.";
const COUNTER_WARN_ABOVE: usize = 1000;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileRow {
    pub index: usize,
    pub name: String,
    pub size: String,
}

pub fn file_rows(files: &StagedFiles) -> Vec<FileRow> {
    files
        .iter()
        .enumerate()
        .map(|(index, f)| FileRow {
            index,
            name: f.name.clone(),
            size: format_file_size(f.size),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharCounter {
    pub count: usize,
    pub warn: bool,
}

pub fn char_counter(text: &str) -> CharCounter {
    let count = text.chars().count();
    CharCounter {
        count,
        warn: count > COUNTER_WARN_ABOVE,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub rank_label: String,
    pub document: String,
    pub page_label: String,
    pub relevance_label: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub headline: String,
    pub analysis_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "lowercase")]
pub enum ResultsView {
    Placeholder,
    Loading {
        title: String,
        message: String,
    },
    Error {
        message: String,
    },
    Results {
        summary: Summary,
        sections: Vec<SectionView>,
    },
}

impl ResultsView {
    pub fn has_results(&self) -> bool {
        matches!(self, ResultsView::Results { .. })
    }
}

/// Results area for a submission phase. Sections keep the order received.
pub fn results_view(phase: &Phase) -> ResultsView {
    match phase {
        Phase::Idle => ResultsView::Placeholder,
        Phase::Uploading => ResultsView::Loading {
            title: LOADING_TITLE.to_string(),
            message: "Uploading files...".to_string(),
        },
        Phase::Analyzing => ResultsView::Loading {
            title: LOADING_TITLE.to_string(),
            message: "Analyzing document content...".to_string(),
        },
        Phase::Failed(message) => ResultsView::Error {
            message: message.clone(),
        },
        Phase::Success(result) => render_result(result),
    }
}

fn render_result(result: &AnalysisResult) -> ResultsView {
    let summary = Summary {
        headline: format!(
            "Found {} highly relevant sections across {} documents",
            result.sections.len(),
            result.metadata.distinct_documents()
        ),
        analysis_type: result
            .metadata
            .analysis_type
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_ANALYSIS_TYPE.to_string()),
    };
    let sections = result
        .sections
        .iter()
        .map(|s| SectionView {
            title: s.title.clone(),
            rank_label: format!("Rank #{}", s.importance_rank),
            document: s.document.clone(),
            page_label: format!("Page {}", s.page),
            relevance_label: s
                .relevance_score
                .filter(|score| *score != 0.0)
                .map(|score| format!("{}% relevance", (score * 100.0).round() as i64)),
            content: s.content.clone(),
        })
        .collect();
    ResultsView::Results { summary, sections }
}

pub fn results_for(app: &App) -> ResultsView {
    results_view(app.phase())
}

fn squash_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

impl fmt::Display for ResultsView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultsView::Placeholder => {
                writeln!(f, "== Ready for Analysis ==")?;
                writeln!(f, "{PLACEHOLDER_HINT}")
            }
            ResultsView::Loading { title, message } => {
                writeln!(f, "== {title} ==")?;
                writeln!(f, "{message}")
            }
            ResultsView::Error { message } => {
                writeln!(f, "== Analysis Error ==")?;
                writeln!(f, "{message}")?;
                writeln!(f, "[Try Again]")
            }
            ResultsView::Results { summary, sections } => {
                writeln!(f, "== Analysis Complete ==")?;
                writeln!(f, "{}", summary.headline)?;
                writeln!(f, "Analysis Type: {}", summary.analysis_type)?;
                for s in sections {
                    writeln!(f)?;
                    writeln!(f, "{}  [{}]", s.title, s.rank_label)?;
                    write!(f, "  {} | {}", s.document, s.page_label)?;
                    if let Some(rel) = &s.relevance_label {
                        write!(f, " | {rel}")?;
                    }
                    writeln!(f)?;
                    writeln!(f, "  {}", squash_whitespace(&s.content))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for FileRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.index, self.name, self.size)
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.enabled { "ready" } else { "disabled" };
        write!(f, "<{}> ({mark})", self.label)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            StatusKind::Success => "ok",
            StatusKind::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

impl fmt::Display for CharCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} characters", self.count)?;
        if self.warn {
            write!(f, " (long)")?;
        }
        Ok(())
    }
}
