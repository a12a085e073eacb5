use crate::adapter::AnswerService;
use crate::types::*;
use parlor_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MockResponse {
    /// Answer with this text
    Text {
        content: String,
        #[serde(default)]
        latency_ms: u64,
    },
    /// Fail like an unreachable or non-2xx service
    Error {
        message: String,
        #[serde(default)]
        latency_ms: u64,
    },
}

impl MockResponse {
    pub fn text(content: impl Into<String>) -> Self {
        MockResponse::Text { content: content.into(), latency_ms: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        MockResponse::Error { message: message.into(), latency_ms: 0 }
    }

    pub fn with_latency(self, latency: Duration) -> Self {
        let latency_ms = latency.as_millis() as u64;
        match self {
            MockResponse::Text { content, .. } => MockResponse::Text { content, latency_ms },
            MockResponse::Error { message, .. } => MockResponse::Error { message, latency_ms },
        }
    }

    fn latency(&self) -> Duration {
        match self {
            MockResponse::Text { latency_ms, .. } | MockResponse::Error { latency_ms, .. } => {
                Duration::from_millis(*latency_ms)
            }
        }
    }
}

/// Mock script from TOML file
#[derive(Debug, Deserialize)]
struct MockScript {
    responses: Vec<MockResponse>,
}

/// Answer service that replays a script, cycling when it runs out.
///
/// With an empty script it echoes the question back.
pub struct ScriptedAnswerService {
    responses: Vec<MockResponse>,
    current: AtomicUsize,
    requests: Mutex<Vec<AnswerRequest>>,
}

impl ScriptedAnswerService {
    pub fn new(responses: Vec<MockResponse>) -> Self {
        Self { responses, current: AtomicUsize::new(0), requests: Mutex::new(Vec::new()) }
    }

    pub fn echo() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let script: MockScript =
            toml::from_str(toml_str).map_err(|e| Error::Parse(format!("failed to parse mock script: {}", e)))?;
        Ok(Self::new(script.responses))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<AnswerRequest> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).clone()
    }

    fn next_response(&self, request: &AnswerRequest) -> MockResponse {
        if self.responses.is_empty() {
            return MockResponse::text(format!("You said: {}", request.question));
        }
        let index = self.current.fetch_add(1, Ordering::SeqCst);
        self.responses[index % self.responses.len()].clone()
    }
}

#[async_trait::async_trait]
impl AnswerService for ScriptedAnswerService {
    async fn ask(&self, request: AnswerRequest) -> Result<String> {
        let response = self.next_response(&request);
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(request);

        let latency = response.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match response {
            MockResponse::Text { content, .. } => Ok(content),
            MockResponse::Error { message, .. } => Err(Error::Service(message)),
        }
    }
}
