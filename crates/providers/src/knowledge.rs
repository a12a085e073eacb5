use reqwest::Client as HttpClient;
use std::sync::Mutex;

use crate::adapter::endpoint;
use crate::types::*;
use parlor_core::{Error, Result};

/// List/create/delete of knowledge bases, keyed by [`KnowledgeBaseId`]
#[async_trait::async_trait]
pub trait KnowledgeBaseRegistry: Send + Sync {
    async fn list(&self) -> Result<Vec<KnowledgeBase>>;

    /// Returns the server's message, if any
    async fn create(&self, base: NewKnowledgeBase) -> Result<Option<String>>;

    /// Returns the server's message, if any
    async fn delete(&self, id: &KnowledgeBaseId) -> Result<Option<String>>;
}

/// Registry backed by the `/rag/knowledge-bases` endpoints
pub struct HttpKnowledgeBaseRegistry {
    client: HttpClient,
    base_url: String,
}

impl HttpKnowledgeBaseRegistry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self { client, base_url: base_url.into() }
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<ApiEnvelope<T>> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Service(format!("failed to read registry response: {}", e)))?;

        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(Error::Service(format!("registry returned {}", status))),
            Err(e) => Err(Error::Parse(format!("unexpected registry response: {}", e))),
        }
    }
}

#[async_trait::async_trait]
impl KnowledgeBaseRegistry for HttpKnowledgeBaseRegistry {
    async fn list(&self) -> Result<Vec<KnowledgeBase>> {
        let url = endpoint(&self.base_url, &["rag", "knowledge-bases"])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Service(format!("knowledge base list failed: {}", e)))?;

        let (data, _) = Self::decode::<Vec<KnowledgeBase>>(response).await?.into_result()?;
        Ok(data.unwrap_or_default())
    }

    async fn create(&self, base: NewKnowledgeBase) -> Result<Option<String>> {
        let url = endpoint(&self.base_url, &["rag", "knowledge-bases"])?;
        let response = self
            .client
            .post(url)
            .json(&base)
            .send()
            .await
            .map_err(|e| Error::Service(format!("knowledge base create failed: {}", e)))?;

        let (_, message) = Self::decode::<serde_json::Value>(response).await?.into_result()?;
        Ok(message)
    }

    async fn delete(&self, id: &KnowledgeBaseId) -> Result<Option<String>> {
        let url = endpoint(&self.base_url, &["rag", "knowledge-bases", id.as_str()])?;
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| Error::Service(format!("knowledge base delete failed: {}", e)))?;

        let (_, message) = Self::decode::<serde_json::Value>(response).await?.into_result()?;
        Ok(message)
    }
}

/// In-process registry for offline use and tests
#[derive(Default)]
pub struct MemoryKnowledgeBaseRegistry {
    bases: Mutex<Vec<KnowledgeBase>>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryKnowledgeBaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bases(bases: Vec<KnowledgeBase>) -> Self {
        Self { bases: Mutex::new(bases), fail_with: Mutex::new(None) }
    }

    /// Make every following call fail with the given message
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.lock_failure() = Some(message.into());
    }

    pub fn snapshot(&self) -> Vec<KnowledgeBase> {
        self.lock_bases().clone()
    }

    fn lock_bases(&self) -> std::sync::MutexGuard<'_, Vec<KnowledgeBase>> {
        self.bases.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_failure(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.fail_with.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_failure(&self) -> Result<()> {
        match self.lock_failure().as_ref() {
            Some(message) => Err(Error::Service(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl KnowledgeBaseRegistry for MemoryKnowledgeBaseRegistry {
    async fn list(&self) -> Result<Vec<KnowledgeBase>> {
        self.check_failure()?;
        Ok(self.snapshot())
    }

    async fn create(&self, base: NewKnowledgeBase) -> Result<Option<String>> {
        self.check_failure()?;
        let mut bases = self.lock_bases();
        if bases.iter().any(|b| b.id == base.id) {
            return Err(Error::Service(format!("knowledge base {} already exists", base.id)));
        }
        bases.push(base);
        Ok(Some("Knowledge base created".to_string()))
    }

    async fn delete(&self, id: &KnowledgeBaseId) -> Result<Option<String>> {
        self.check_failure()?;
        let mut bases = self.lock_bases();
        let before = bases.len();
        bases.retain(|b| &b.id != id);
        if bases.len() == before {
            return Err(Error::Service(format!("knowledge base {} not found", id)));
        }
        Ok(Some("Knowledge base deleted".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{local_client, serve_once};

    #[tokio::test]
    async fn test_memory_registry_lifecycle() {
        let registry = MemoryKnowledgeBaseRegistry::with_bases(vec![KnowledgeBase::new(
            "coffee_collection",
            "Coffee",
            "",
        )]);

        registry.create(KnowledgeBase::new("kb_1", "Tea", "leaves")).await.unwrap();
        assert_eq!(registry.list().await.unwrap().len(), 2);

        let duplicate = registry.create(KnowledgeBase::new("kb_1", "Tea", "")).await;
        assert!(duplicate.is_err());

        let message = registry.delete(&KnowledgeBaseId::new("kb_1")).await.unwrap();
        assert_eq!(message.as_deref(), Some("Knowledge base deleted"));
        assert_eq!(registry.snapshot().len(), 1);

        assert!(registry.delete(&KnowledgeBaseId::new("kb_1")).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_registry_failure_mode() {
        let registry = MemoryKnowledgeBaseRegistry::new();
        registry.fail_with("registry offline");

        let err = registry.list().await.unwrap_err();
        assert_eq!(err.to_string(), "service error: registry offline");
    }

    #[tokio::test]
    async fn test_http_registry_unreachable() {
        let registry = HttpKnowledgeBaseRegistry::new("http://127.0.0.1:9");
        assert!(registry.list().await.unwrap_err().is_service());
    }

    #[tokio::test]
    async fn test_http_registry_lists_enveloped_bases() {
        let body = r#"{"success":true,"data":[{"id":"coffee_collection","name":"Coffee","description":"beans"},{"id":"kb_1","name":"Tea"}]}"#;
        let (base_url, server) = serve_once("200 OK", "application/json", body).await;
        let registry = HttpKnowledgeBaseRegistry::with_client(local_client(), base_url);

        let bases = registry.list().await.unwrap();
        assert_eq!(
            bases,
            vec![KnowledgeBase::new("coffee_collection", "Coffee", "beans"), KnowledgeBase::new("kb_1", "Tea", "")]
        );
        assert!(server.await.unwrap().starts_with("GET /rag/knowledge-bases "));
    }

    #[tokio::test]
    async fn test_http_registry_unsuccessful_envelope_carries_message() {
        let body = r#"{"success":false,"message":"name already taken"}"#;
        let (base_url, server) = serve_once("200 OK", "application/json", body).await;
        let registry = HttpKnowledgeBaseRegistry::with_client(local_client(), base_url);

        let err = registry.create(KnowledgeBase::new("kb_2", "Tea", "")).await.unwrap_err();
        assert!(matches!(&err, Error::Service(message) if message == "name already taken"));
        assert!(server.await.unwrap().starts_with("POST /rag/knowledge-bases "));
    }

    #[tokio::test]
    async fn test_http_registry_delete_without_data() {
        let body = r#"{"success":true,"message":"Knowledge base deleted"}"#;
        let (base_url, server) = serve_once("200 OK", "application/json", body).await;
        let registry = HttpKnowledgeBaseRegistry::with_client(local_client(), base_url);

        let message = registry.delete(&KnowledgeBaseId::new("kb_1")).await.unwrap();
        assert_eq!(message.as_deref(), Some("Knowledge base deleted"));
        assert!(server.await.unwrap().starts_with("DELETE /rag/knowledge-bases/kb_1 "));
    }

    #[tokio::test]
    async fn test_http_registry_non_json_error_status() {
        let (base_url, server) = serve_once("502 Bad Gateway", "text/html", "<h1>bad gateway</h1>").await;
        let registry = HttpKnowledgeBaseRegistry::with_client(local_client(), base_url);

        let err = registry.list().await.unwrap_err();
        assert!(matches!(&err, Error::Service(message) if message == "registry returned 502 Bad Gateway"));
        server.await.unwrap();
    }
}
