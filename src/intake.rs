use crate::{
    controller::{Effect, Status},
    model::{IncomingFile, PDF_MEDIA_TYPE, StagedFile},
    util::is_pdf_path,
};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub const MIN_FILES: usize = 3;
pub const MAX_FILES: usize = 10;

/// Ordered staged files; insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct StagedFiles {
    files: Vec<StagedFile>,
}

impl StagedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StagedFile> {
        self.files.iter()
    }

    pub fn as_slice(&self) -> &[StagedFile] {
        &self.files
    }

    /// Single entry point for drops and picker selections.
    ///
    /// Non-PDF entries are dropped before any check. A batch that would take
    /// the staged count past [`MAX_FILES`] is rejected whole.
    pub fn add_files(&mut self, batch: Vec<IncomingFile>) -> Vec<Effect> {
        let pdfs: Vec<IncomingFile> = batch.into_iter().filter(IncomingFile::is_pdf).collect();

        if self.files.len() + pdfs.len() > MAX_FILES {
            return vec![Effect::Status(Status::error("Maximum 10 files allowed"))];
        }
        if pdfs.is_empty() {
            return vec![Effect::Status(Status::error("Please select PDF files only"))];
        }

        let offered = pdfs.len();
        for file in pdfs {
            if self.files.len() >= MAX_FILES {
                break;
            }
            if self.files.iter().any(|f| f.same_identity(&file.name, file.size)) {
                debug!(name = %file.name, size = file.size, "skipping duplicate file");
                continue;
            }
            self.files.push(file.into());
        }

        vec![
            Effect::RenderFileList,
            Effect::RenderGate,
            Effect::Status(Status::success(format!("Added {offered} PDF file(s)"))),
        ]
    }

    pub fn remove_file(&mut self, index: usize) -> Vec<Effect> {
        if index >= self.files.len() {
            return vec![Effect::Status(Status::error(format!(
                "No file at position {index}"
            )))];
        }
        let removed = self.files.remove(index);
        debug!(name = %removed.name, index, "removed staged file");
        vec![
            Effect::RenderFileList,
            Effect::RenderGate,
            Effect::Status(Status::success("File removed")),
        ]
    }
}

/// Reads a file from disk as a picker would offer it. The media type comes
/// from the extension; non-PDFs are still returned so intake can drop them.
pub fn read_incoming(path: &Path) -> Result<IncomingFile> {
    let content =
        std::fs::read(path).with_context(|| format!("reading input: {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = if is_pdf_path(path) {
        PDF_MEDIA_TYPE
    } else {
        "application/octet-stream"
    };
    Ok(IncomingFile {
        name,
        size: content.len() as u64,
        media_type: media_type.to_string(),
        content,
    })
}
