use super::{
    AnalyzeIn, Backend, BackendError, HealthOut, UploadOut,
    types::{CleanupIn, ErrorBody},
};
use crate::{
    config::Config,
    model::{AnalysisResult, PDF_MEDIA_TYPE, StagedFile},
};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response, multipart};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(cfg: &Config) -> Result<Self> {
        let timeout =
            (cfg.backend.timeout_seconds > 0).then(|| Duration::from_secs(cfg.backend.timeout_seconds));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .with_context(|| "building HTTP client")?;
        Ok(Self {
            client,
            base_url: cfg.backend.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::Transport(err.to_string())
}

/// Decodes a 2xx body as `O`; anything else becomes `BackendError::Status`
/// carrying the server's `error` field when the body has one.
fn read_json<O: DeserializeOwned>(resp: Response) -> Result<O, BackendError> {
    let status = resp.status();
    let body = resp.text().map_err(transport)?;
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        return Err(BackendError::Status {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

impl Backend for HttpBackend {
    fn upload(&self, session_id: &str, files: &[StagedFile]) -> Result<UploadOut, BackendError> {
        let mut form = multipart::Form::new();
        for f in files {
            let part = multipart::Part::bytes(f.content.clone())
                .file_name(f.name.clone())
                .mime_str(PDF_MEDIA_TYPE)
                .map_err(transport)?;
            form = form.part("files", part);
        }
        form = form.text("session_id", session_id.to_string());

        debug!("POST /api/upload files={} session_id={session_id}", files.len());
        let resp = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .map_err(transport)?;
        read_json(resp)
    }

    fn analyze(&self, req: &AnalyzeIn) -> Result<AnalysisResult, BackendError> {
        debug!("POST /api/analyze session_id={}", req.session_id);
        let resp = self
            .client
            .post(self.url("/api/analyze"))
            .json(req)
            .send()
            .map_err(transport)?;
        read_json(resp)
    }

    fn health(&self) -> Result<HealthOut, BackendError> {
        let resp = self
            .client
            .get(self.url("/api/health"))
            .send()
            .map_err(transport)?;
        read_json(resp)
    }

    fn cleanup(&self, session_id: &str) -> Result<(), BackendError> {
        let body = CleanupIn {
            session_id: session_id.to_string(),
        };
        // Response body is ignored.
        self.client
            .post(self.url("/api/cleanup"))
            .json(&body)
            .send()
            .map_err(transport)?;
        Ok(())
    }
}
