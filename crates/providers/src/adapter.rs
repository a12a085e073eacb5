use reqwest::{Client as HttpClient, Url};
use std::sync::Arc;

use crate::ingest::{FileIngestion, HttpFileIngestion, MemoryFileIngestion};
use crate::knowledge::{HttpKnowledgeBaseRegistry, KnowledgeBaseRegistry, MemoryKnowledgeBaseRegistry};
use crate::mock::ScriptedAnswerService;
use crate::types::*;
use parlor_core::{BackendKind, Config, Error, Result};

/// Remote collaborator that turns a question into a complete answer text
#[async_trait::async_trait]
pub trait AnswerService: Send + Sync {
    /// Resolve a question to the full answer. Dropping the returned future
    /// aborts the request.
    async fn ask(&self, request: AnswerRequest) -> Result<String>;
}

/// Build `{base}/{segments..}` with each segment percent-encoded
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(base_url).map_err(|e| Error::Config(format!("invalid base_url {}: {}", base_url, e)))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| Error::Config(format!("base_url cannot be a base: {}", base_url)))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    Ok(url)
}

/// HTTP answer service: `GET /text` for plain chat, `GET /rag/ask` for
/// knowledge-base answers
pub struct HttpAnswerService {
    client: HttpClient,
    base_url: String,
}

impl HttpAnswerService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL including the query string
    pub fn request_url(&self, request: &AnswerRequest) -> Result<Url> {
        let url = match &request.mode {
            AnswerMode::Plain => {
                let mut url = endpoint(&self.base_url, &["text"])?;
                url.query_pairs_mut()
                    .append_pair("message", &request.question)
                    .append_pair("conversationId", request.conversation_id.as_str());
                url
            }
            AnswerMode::Knowledge { knowledge_base } => {
                let mut url = endpoint(&self.base_url, &["rag", "ask"])?;
                url.query_pairs_mut()
                    .append_pair("question", &request.question)
                    .append_pair("collectionName", knowledge_base.as_str())
                    .append_pair("conversationId", request.conversation_id.as_str());
                url
            }
        };
        Ok(url)
    }
}

#[async_trait::async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, request: AnswerRequest) -> Result<String> {
        let url = self.request_url(&request)?;
        tracing::debug!(path = url.path(), knowledge = request.is_knowledge(), "sending question");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Service(format!("answer request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::Service(format!("answer service returned {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| Error::Service(format!("failed to read answer body: {}", e)))
    }
}

/// The three outbound collaborators, built for the configured backend
#[derive(Clone)]
pub struct ServiceBundle {
    pub answers: Arc<dyn AnswerService>,
    pub registry: Arc<dyn KnowledgeBaseRegistry>,
    pub ingestion: Arc<dyn FileIngestion>,
}

impl ServiceBundle {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.service.backend {
            BackendKind::Http => {
                let client = HttpClient::new();
                let base = config.service.base_url.clone();
                Ok(Self {
                    answers: Arc::new(HttpAnswerService::with_client(client.clone(), base.clone())),
                    registry: Arc::new(HttpKnowledgeBaseRegistry::with_client(client.clone(), base.clone())),
                    ingestion: Arc::new(HttpFileIngestion::with_client(client, base)),
                })
            }
            BackendKind::Mock => {
                let answers = match &config.service.mock_script {
                    Some(path) => ScriptedAnswerService::from_file(path)?,
                    None => ScriptedAnswerService::echo(),
                };
                let default_base = KnowledgeBase::new(
                    config.knowledge.default_base.as_str(),
                    "Default knowledge base",
                    "Built-in knowledge base",
                );
                Ok(Self {
                    answers: Arc::new(answers),
                    registry: Arc::new(MemoryKnowledgeBaseRegistry::with_bases(vec![default_base])),
                    ingestion: Arc::new(MemoryFileIngestion::new()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{local_client, serve_once};
    use parlor_core::ConversationId;

    fn conversation() -> ConversationId {
        ConversationId::parse("1700000000000_42").unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let url = endpoint("http://localhost:8080", &["rag", "knowledge-bases"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/rag/knowledge-bases");

        let url = endpoint("http://example.com/api/", &["text"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/api/text");

        let url = endpoint("http://example.com", &["rag", "knowledge-bases", "kb 1/x"]).unwrap();
        assert_eq!(url.as_str(), "http://example.com/rag/knowledge-bases/kb%201%2Fx");
    }

    #[test]
    fn test_endpoint_rejects_bad_base() {
        assert!(endpoint("not a url", &["text"]).is_err());
    }

    #[test]
    fn test_plain_request_url() {
        let service = HttpAnswerService::new("http://localhost:8080");
        let request = AnswerRequest::plain("what is a flat white?", conversation());
        let url = service.request_url(&request).unwrap();

        assert_eq!(url.path(), "/text");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("message".to_string(), "what is a flat white?".to_string()),
                ("conversationId".to_string(), "1700000000000_42".to_string()),
            ]
        );
    }

    #[test]
    fn test_knowledge_request_url() {
        let service = HttpAnswerService::new("http://localhost:8080");
        let request = AnswerRequest::knowledge("烘焙 & grind", "coffee_collection".into(), conversation());
        let url = service.request_url(&request).unwrap();

        assert_eq!(url.path(), "/rag/ask");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("question".to_string(), "烘焙 & grind".to_string()));
        assert_eq!(pairs[1], ("collectionName".to_string(), "coffee_collection".to_string()));
        assert_eq!(pairs[2], ("conversationId".to_string(), "1700000000000_42".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_service_error() {
        let service = HttpAnswerService::new("http://127.0.0.1:9");
        let err = service.ask(AnswerRequest::plain("hi", conversation())).await.unwrap_err();
        assert!(err.is_service());
    }

    #[tokio::test]
    async fn test_success_body_is_the_answer() {
        let (base_url, server) = serve_once("200 OK", "text/plain", "hi there").await;
        let service = HttpAnswerService::with_client(local_client(), base_url);

        let answer = service.ask(AnswerRequest::plain("hello", conversation())).await.unwrap();
        assert_eq!(answer, "hi there");

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /text?message=hello&conversationId=1700000000000_42 "), "{head}");
    }

    #[tokio::test]
    async fn test_non_success_status_is_service_error() {
        let (base_url, server) = serve_once("500 Internal Server Error", "text/plain", "boom").await;
        let service = HttpAnswerService::with_client(local_client(), base_url);

        let request = AnswerRequest::knowledge("why?", "coffee_collection".into(), conversation());
        let err = service.ask(request).await.unwrap_err();
        let expected = "answer service returned 500 Internal Server Error";
        assert!(matches!(&err, Error::Service(message) if message == expected), "{err:?}");

        let head = server.await.unwrap();
        assert!(head.starts_with("GET /rag/ask?"), "{head}");
    }

    #[tokio::test]
    async fn test_mock_bundle_from_config() {
        let mut config = Config::default();
        config.service.backend = BackendKind::Mock;

        let bundle = ServiceBundle::from_config(&config).unwrap();
        let answer = bundle.answers.ask(AnswerRequest::plain("ping", conversation())).await.unwrap();
        assert!(answer.contains("ping"));

        let bases = bundle.registry.list().await.unwrap();
        assert_eq!(bases.len(), 1);
        assert_eq!(bases[0].id.as_str(), "coffee_collection");
    }
}
