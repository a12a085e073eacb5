use parlor_core::{Config, ConversationId, IdentityStore, ParlorDir, Result};
use parlor_providers::{AnswerRequest, KnowledgeBaseId};

/// Per-session state that parameterizes every answer request: the
/// conversation identity, whether knowledge-base mode is on, and which base is
/// selected. Created once at startup and owned by the controller.
#[derive(Debug, Clone)]
pub struct SessionContext {
    identity: IdentityStore,
    knowledge_mode: bool,
    knowledge_base: KnowledgeBaseId,
    default_base: KnowledgeBaseId,
}

impl SessionContext {
    pub fn new(identity: IdentityStore, default_base: KnowledgeBaseId) -> Self {
        Self { identity, knowledge_mode: false, knowledge_base: default_base.clone(), default_base }
    }

    /// In-memory identity, plain mode, `coffee_collection` selected
    pub fn ephemeral() -> Self {
        Self::new(IdentityStore::in_memory(), KnowledgeBaseId::new("coffee_collection"))
    }

    /// Open the persisted identity named by the config (or `~/.parlor/conversation_id`)
    pub fn from_config(config: &Config) -> Result<Self> {
        let state_file = match &config.session.state_file {
            Some(path) => path.clone(),
            None => ParlorDir::from_home()?.conversation_file(),
        };
        let identity = IdentityStore::open(state_file)?;
        let mut context = Self::new(identity, KnowledgeBaseId::new(config.knowledge.default_base.clone()));
        context.knowledge_mode = config.knowledge.enabled;
        Ok(context)
    }

    pub fn conversation_id(&self) -> &ConversationId {
        self.identity.current()
    }

    /// Start a new conversation identity
    pub fn reset_conversation(&mut self) -> Result<ConversationId> {
        Ok(self.identity.reset()?.clone())
    }

    pub fn knowledge_mode(&self) -> bool {
        self.knowledge_mode
    }

    pub fn set_knowledge_mode(&mut self, enabled: bool) {
        self.knowledge_mode = enabled;
    }

    pub fn knowledge_base(&self) -> &KnowledgeBaseId {
        &self.knowledge_base
    }

    pub fn default_base(&self) -> &KnowledgeBaseId {
        &self.default_base
    }

    pub fn select_knowledge_base(&mut self, id: KnowledgeBaseId) {
        self.knowledge_base = id;
    }

    /// Request for `question` addressed according to the current mode
    pub fn answer_request(&self, question: impl Into<String>) -> AnswerRequest {
        let conversation_id = self.identity.current().clone();
        if self.knowledge_mode {
            AnswerRequest::knowledge(question, self.knowledge_base.clone(), conversation_id)
        } else {
            AnswerRequest::plain(question, conversation_id)
        }
    }
}
