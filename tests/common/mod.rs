#![allow(dead_code)]

use docintel::{
    backend::{AnalyzeIn, Backend, BackendError, HealthOut, UploadOut},
    model::{AnalysisResult, IncomingFile, ResultMetadata, ResultSection, StagedFile},
};
use std::cell::RefCell;

#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, Option<&'static str>),
    Transport(&'static str),
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, BackendError> {
        match self {
            Reply::Ok(v) => Ok(v.clone()),
            Reply::Status(status, message) => Err(BackendError::Status {
                status: *status,
                message: message.map(str::to_string),
            }),
            Reply::Transport(msg) => Err(BackendError::Transport(msg.to_string())),
        }
    }
}

pub struct MockBackend {
    pub upload_reply: Reply<UploadOut>,
    pub analyze_reply: Reply<AnalysisResult>,
    pub health_status: Option<&'static str>,
    pub calls: RefCell<Vec<&'static str>>,
    pub uploads: RefCell<Vec<(String, Vec<String>)>>,
    pub analyses: RefCell<Vec<AnalyzeIn>>,
    pub cleaned: RefCell<Vec<String>>,
}

impl MockBackend {
    pub fn new(analyze_reply: Reply<AnalysisResult>) -> Self {
        Self {
            upload_reply: Reply::Ok(UploadOut {
                success: true,
                files_processed: Some(3),
                session_id: None,
            }),
            analyze_reply,
            health_status: Some("healthy"),
            calls: RefCell::new(Vec::new()),
            uploads: RefCell::new(Vec::new()),
            analyses: RefCell::new(Vec::new()),
            cleaned: RefCell::new(Vec::new()),
        }
    }

    pub fn returning(result: AnalysisResult) -> Self {
        Self::new(Reply::Ok(result))
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl Backend for MockBackend {
    fn upload(&self, session_id: &str, files: &[StagedFile]) -> Result<UploadOut, BackendError> {
        self.calls.borrow_mut().push("upload");
        self.uploads.borrow_mut().push((
            session_id.to_string(),
            files.iter().map(|f| f.name.clone()).collect(),
        ));
        self.upload_reply.get()
    }

    fn analyze(&self, req: &AnalyzeIn) -> Result<AnalysisResult, BackendError> {
        self.calls.borrow_mut().push("analyze");
        self.analyses.borrow_mut().push(req.clone());
        self.analyze_reply.get()
    }

    fn health(&self) -> Result<HealthOut, BackendError> {
        self.calls.borrow_mut().push("health");
        match self.health_status {
            Some(status) => Ok(HealthOut {
                status: status.to_string(),
                extra: Default::default(),
            }),
            None => Err(BackendError::Transport("connection refused".into())),
        }
    }

    fn cleanup(&self, session_id: &str) -> Result<(), BackendError> {
        self.calls.borrow_mut().push("cleanup");
        self.cleaned.borrow_mut().push(session_id.to_string());
        Ok(())
    }
}

pub fn pdf(name: &str, size: usize) -> IncomingFile {
    IncomingFile::pdf(name, vec![b'%'; size])
}

pub fn not_pdf(name: &str) -> IncomingFile {
    IncomingFile {
        name: name.to_string(),
        size: 4,
        media_type: "text/plain".to_string(),
        content: b"text".to_vec(),
    }
}

pub fn pdfs(n: usize, prefix: &str) -> Vec<IncomingFile> {
    (0..n).map(|i| pdf(&format!("{prefix}{i}.pdf"), 100 + i)).collect()
}

pub fn section(title: &str, document: &str, rank: u32, score: Option<f64>) -> ResultSection {
    ResultSection {
        title: title.to_string(),
        document: document.to_string(),
        page: 1,
        importance_rank: rank,
        relevance_score: score,
        content: format!("content of {title}"),
    }
}

pub fn result(sections: Vec<ResultSection>, documents: &[&str]) -> AnalysisResult {
    AnalysisResult {
        sections,
        metadata: ResultMetadata {
            documents: documents.iter().map(|d| d.to_string()).collect(),
            analysis_type: None,
            persona: None,
            job_to_be_done: None,
        },
    }
}

pub const PERSONA: &str = "Senior investment analyst covering semiconductors";
pub const JOB: &str = "Compare R&D spending trends across the uploaded annual reports";
