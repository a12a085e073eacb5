use parlor_core::{ConversationId, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Opaque knowledge-base (collection) identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBaseId(String);

impl KnowledgeBaseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `kb_<unix-millis>`, the shape used for user-created bases
    pub fn generate() -> Self {
        Self(format!("kb_{}", chrono::Utc::now().timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KnowledgeBaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for KnowledgeBaseId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which endpoint answers a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerMode {
    /// Plain chat
    Plain,
    /// Retrieval over the given knowledge base
    Knowledge { knowledge_base: KnowledgeBaseId },
}

/// A single question sent to the answer service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRequest {
    pub question: String,
    pub mode: AnswerMode,
    pub conversation_id: ConversationId,
}

impl AnswerRequest {
    pub fn plain(question: impl Into<String>, conversation_id: ConversationId) -> Self {
        Self { question: question.into(), mode: AnswerMode::Plain, conversation_id }
    }

    pub fn knowledge(
        question: impl Into<String>, knowledge_base: KnowledgeBaseId, conversation_id: ConversationId,
    ) -> Self {
        Self { question: question.into(), mode: AnswerMode::Knowledge { knowledge_base }, conversation_id }
    }

    pub fn is_knowledge(&self) -> bool {
        matches!(self.mode, AnswerMode::Knowledge { .. })
    }
}

/// Knowledge base as listed by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: KnowledgeBaseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl KnowledgeBase {
    pub fn new(id: impl Into<KnowledgeBaseId>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), description: description.into() }
    }
}

impl From<String> for KnowledgeBaseId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Body of a create request
pub type NewKnowledgeBase = KnowledgeBase;

/// `{success, data?, message?}` wrapper used by the registry endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), message: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, data: None, message: Some(message.into()) }
    }

    /// Unwrap the envelope, turning `success = false` into a service error
    /// carrying the server's message.
    pub fn into_result(self) -> Result<(Option<T>, Option<String>)> {
        if self.success {
            Ok((self.data, self.message))
        } else {
            let message = self.message.unwrap_or_else(|| "request was not successful".to_string());
            Err(Error::Service(message))
        }
    }
}

/// File queued for ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Read a file from disk, keeping only its file name
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Validation(format!("not a file: {}", path.display())))?;
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// `name (x.xx MB)`
    pub fn describe(&self) -> String {
        format!("{} ({:.2} MB)", self.name, self.size() as f64 / 1024.0 / 1024.0)
    }
}
