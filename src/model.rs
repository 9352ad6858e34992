use crate::util::new_session_id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Opaque per-controller token that scopes uploads on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: new_session_id(),
        }
    }

    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A candidate file offered by a drop or a picker selection.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub name: String,
    pub size: u64,
    pub media_type: String,
    pub content: Vec<u8>,
}

impl IncomingFile {
    pub fn pdf(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: content.len() as u64,
            media_type: PDF_MEDIA_TYPE.to_string(),
            content,
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE
    }
}

#[derive(Debug, Clone)]
pub struct StagedFile {
    pub name: String,
    pub size: u64,
    pub content: Vec<u8>,
}

impl StagedFile {
    /// Duplicate identity: name and byte size, never content.
    pub fn same_identity(&self, name: &str, size: u64) -> bool {
        self.name == name && self.size == size
    }
}

impl From<IncomingFile> for StagedFile {
    fn from(f: IncomingFile) -> Self {
        Self {
            name: f.name,
            size: f.size,
            content: f.content,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Draft {
    #[serde(default)]
    pub persona: String,
    #[serde(default, rename = "jobToBeDone")]
    pub job_to_be_done: String,
    /// Unix milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultSection {
    pub title: String,
    pub document: String,
    pub page: u32,
    pub importance_rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultMetadata {
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_to_be_done: Option<String>,
}

impl ResultMetadata {
    pub fn distinct_documents(&self) -> usize {
        self.documents.iter().collect::<BTreeSet<_>>().len()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default)]
    pub sections: Vec<ResultSection>,
    #[serde(default)]
    pub metadata: ResultMetadata,
}
