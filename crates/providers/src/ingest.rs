use reqwest::Client as HttpClient;
use reqwest::multipart::{Form, Part};
use std::sync::Mutex;

use crate::adapter::endpoint;
use crate::types::*;
use parlor_core::{Error, Result};

/// Pushes documents into a knowledge base
#[async_trait::async_trait]
pub trait FileIngestion: Send + Sync {
    /// Upload a batch; returns the service's human-readable status
    async fn upload(&self, files: Vec<UploadFile>, knowledge_base: &KnowledgeBaseId, tag: &str) -> Result<String>;
}

/// Multipart `POST /rag/upload-file`
pub struct HttpFileIngestion {
    client: HttpClient,
    base_url: String,
}

impl HttpFileIngestion {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    fn form(files: Vec<UploadFile>, knowledge_base: &KnowledgeBaseId, tag: &str) -> Form {
        let mut form = Form::new();
        for file in files {
            form = form.part("file", Part::bytes(file.bytes).file_name(file.name));
        }
        form.text("tag", tag.to_string())
            .text("collectionName", knowledge_base.as_str().to_string())
    }
}

#[async_trait::async_trait]
impl FileIngestion for HttpFileIngestion {
    async fn upload(&self, files: Vec<UploadFile>, knowledge_base: &KnowledgeBaseId, tag: &str) -> Result<String> {
        if files.is_empty() {
            return Err(Error::Validation("no files selected".to_string()));
        }

        let url = endpoint(&self.base_url, &["rag", "upload-file"])?;
        tracing::debug!(count = files.len(), knowledge_base = %knowledge_base, "uploading files");

        let response = self
            .client
            .post(url)
            .multipart(Self::form(files, knowledge_base, tag))
            .send()
            .await
            .map_err(|e| Error::Service(format!("upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Service(format!("upload service returned {}", response.status())));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Service(format!("failed to read upload response: {}", e)))
    }
}

/// Records uploads in memory
#[derive(Default)]
pub struct MemoryFileIngestion {
    received: Mutex<Vec<(KnowledgeBaseId, String, String)>>,
}

impl MemoryFileIngestion {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(knowledge base, file name, tag)` for every file seen so far
    pub fn received(&self) -> Vec<(KnowledgeBaseId, String, String)> {
        self.received.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }
}

#[async_trait::async_trait]
impl FileIngestion for MemoryFileIngestion {
    async fn upload(&self, files: Vec<UploadFile>, knowledge_base: &KnowledgeBaseId, tag: &str) -> Result<String> {
        if files.is_empty() {
            return Err(Error::Validation("no files selected".to_string()));
        }

        let count = files.len();
        let mut received = self.received.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for file in files {
            received.push((knowledge_base.clone(), file.name, tag.to_string()));
        }
        Ok(format!("Uploaded {} file(s) to {}", count, knowledge_base))
    }
}
