//! Interaction surface.
//!
//! Maps user intents onto controller operations and talks to the knowledge-base
//! and ingestion collaborators. Affordances are computed from the controller
//! state on every read and never stored.

mod intent;
mod knowledge;

pub use intent::{Affordances, Intent, IntentOutcome, PrimaryAction};
pub use knowledge::{DEFAULT_BASE_NAME, KnowledgeCatalog};

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::context::SessionContext;
use crate::lifecycle::{Controller, LifecycleEvent, LifecycleState};
use crate::transcript::{MessageId, Role, TranscriptChange, TranscriptStore};
use parlor_core::{Config, Error, Result};
use parlor_providers::{
    FileIngestion, KnowledgeBase, KnowledgeBaseId, KnowledgeBaseRegistry, ServiceBundle, UploadFile,
};

pub const WELCOME_TEXT: &str = "Welcome to the chat assistant! Ask me anything.";
pub const KNOWLEDGE_ON_TEXT: &str =
    "Knowledge base mode enabled. Uploaded files go to the selected knowledge base.";
pub const KNOWLEDGE_OFF_TEXT: &str = "Knowledge base mode disabled. The assistant answers directly.";
pub const UPLOAD_FAILED_TEXT: &str = "File upload failed";

const DEFAULT_UPLOAD_TAG: &str = "general";

pub struct Surface {
    controller: Controller,
    registry: Arc<dyn KnowledgeBaseRegistry>,
    ingestion: Arc<dyn FileIngestion>,
    catalog: KnowledgeCatalog,
    upload_tag: String,
    clipboard: Option<String>,
}

impl Surface {
    /// Wrap a controller; the transcript is seeded with the welcome message
    pub fn new(
        controller: Controller, registry: Arc<dyn KnowledgeBaseRegistry>, ingestion: Arc<dyn FileIngestion>,
    ) -> Self {
        let catalog = KnowledgeCatalog::new(controller.context().default_base().clone());
        let mut surface = Self {
            controller,
            registry,
            ingestion,
            catalog,
            upload_tag: DEFAULT_UPLOAD_TAG.to_string(),
            clipboard: None,
        };
        surface.controller.announce(WELCOME_TEXT);
        surface
    }

    pub fn from_config(config: &Config, services: ServiceBundle, context: SessionContext) -> Self {
        let controller = Controller::from_config(config, services.answers, context);
        Self::new(controller, services.registry, services.ingestion)
            .with_upload_tag(config.knowledge.upload_tag.clone())
    }

    pub fn with_upload_tag(mut self, tag: impl Into<String>) -> Self {
        self.upload_tag = tag.into();
        self
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn transcript(&self) -> &TranscriptStore {
        self.controller.transcript()
    }

    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TranscriptChange> {
        self.controller.subscribe()
    }

    pub fn state(&self) -> LifecycleState {
        self.controller.state()
    }

    pub fn affordances(&self) -> Affordances {
        Affordances::for_state(self.controller.state())
    }

    pub fn catalog(&self) -> &KnowledgeCatalog {
        &self.catalog
    }

    /// Last copied text
    pub fn clipboard(&self) -> Option<&str> {
        self.clipboard.as_deref()
    }

    pub async fn next_lifecycle_event(&mut self) -> Option<LifecycleEvent> {
        self.controller.next_event().await
    }

    pub fn handle_lifecycle_event(&mut self, event: LifecycleEvent) {
        self.controller.handle_event(event);
    }

    pub async fn run_until_idle(&mut self) {
        self.controller.run_until_idle().await;
    }

    /// Apply a user intent. Disabled controls yield [`IntentOutcome::Ignored`].
    pub fn apply(&mut self, intent: Intent) -> Result<IntentOutcome> {
        let affordances = self.affordances();
        let outcome = match intent {
            Intent::Send(text) => {
                if affordances.primary != PrimaryAction::Send {
                    IntentOutcome::Ignored
                } else {
                    self.controller.start(&text).map_or(IntentOutcome::Ignored, IntentOutcome::Started)
                }
            }
            Intent::Interrupt => {
                if self.controller.cancel() {
                    IntentOutcome::Interrupted
                } else {
                    IntentOutcome::Ignored
                }
            }
            Intent::Primary(text) => match affordances.primary {
                PrimaryAction::Send => return self.apply(Intent::Send(text)),
                PrimaryAction::Interrupt => return self.apply(Intent::Interrupt),
            },
            Intent::Copy(id) if affordances.can_copy => self.copy(id),
            Intent::CopyLast if affordances.can_copy => match self.last_answer() {
                Some(id) => self.copy(id),
                None => IntentOutcome::Ignored,
            },
            Intent::Regenerate(id) if affordances.can_regenerate => self.regenerate(id),
            Intent::RegenerateLast if affordances.can_regenerate => match self.last_answer() {
                Some(id) => self.regenerate(id),
                None => IntentOutcome::Ignored,
            },
            Intent::Copy(_) | Intent::CopyLast | Intent::Regenerate(_) | Intent::RegenerateLast => {
                IntentOutcome::Ignored
            }
            Intent::NewConversation => match self.controller.new_conversation() {
                Ok(id) => {
                    self.controller.announce(WELCOME_TEXT);
                    info!(conversation_id = %id, "started new conversation");
                    IntentOutcome::ConversationReset(id)
                }
                Err(err) => {
                    warn!(error = %err, "failed to start new conversation");
                    self.controller
                        .announce(format!("Failed to start a new conversation: {}", failure_reason(&err)));
                    return Err(err);
                }
            },
            Intent::SetKnowledgeMode(enabled) => self.set_knowledge_mode(enabled),
            Intent::SelectKnowledgeBase(id) => self.select_knowledge_base(id),
        };

        if outcome == IntentOutcome::Ignored {
            debug!(state = self.state().as_str(), "intent ignored");
        }
        Ok(outcome)
    }

    fn copy(&mut self, id: MessageId) -> IntentOutcome {
        match self.controller.copy(id) {
            Some(content) => {
                self.clipboard = Some(content.clone());
                IntentOutcome::Copied(content)
            }
            None => IntentOutcome::Ignored,
        }
    }

    fn regenerate(&mut self, id: MessageId) -> IntentOutcome {
        self.controller
            .regenerate(id)
            .map_or(IntentOutcome::Ignored, IntentOutcome::Regenerated)
    }

    fn last_answer(&self) -> Option<MessageId> {
        self.transcript().last_of_role(Role::Assistant).map(|record| record.id)
    }

    /// Route following questions through the knowledge-base endpoint, or not
    pub fn set_knowledge_mode(&mut self, enabled: bool) -> IntentOutcome {
        self.controller.context_mut().set_knowledge_mode(enabled);
        self.controller
            .announce(if enabled { KNOWLEDGE_ON_TEXT } else { KNOWLEDGE_OFF_TEXT });
        IntentOutcome::KnowledgeModeChanged(enabled)
    }

    /// Switch to a base from the catalog; unknown ids are ignored
    pub fn select_knowledge_base(&mut self, id: KnowledgeBaseId) -> IntentOutcome {
        if !self.catalog.contains(&id) {
            debug!(knowledge_base = %id, "unknown knowledge base");
            return IntentOutcome::Ignored;
        }
        let name = self.catalog.name_of(&id);
        self.controller.context_mut().select_knowledge_base(id.clone());
        self.controller.announce(format!("Switched to knowledge base: {}", name));
        IntentOutcome::KnowledgeBaseSelected(id)
    }

    /// Reload the catalog from the registry. Failures are logged and the
    /// current catalog is kept.
    pub async fn refresh_knowledge_bases(&mut self) {
        match self.registry.list().await {
            Ok(bases) => {
                debug!(count = bases.len(), "knowledge bases loaded");
                self.catalog.replace(bases);
                let selected = self.controller.context().knowledge_base().clone();
                if !self.catalog.contains(&selected) {
                    let default = self.catalog.default_id().clone();
                    self.controller.context_mut().select_knowledge_base(default);
                }
            }
            Err(err) => warn!(error = %err, "failed to load knowledge bases"),
        }
    }

    pub async fn create_knowledge_base(&mut self, name: &str, description: &str) -> Result<KnowledgeBaseId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("knowledge base name is required".to_string()));
        }

        let base = KnowledgeBase::new(KnowledgeBaseId::generate(), name, description.trim());
        match self.registry.create(base.clone()).await {
            Ok(_) => {
                let id = base.id.clone();
                self.catalog.insert(base);
                self.controller.context_mut().select_knowledge_base(id.clone());
                self.controller.announce(format!("Created knowledge base: {}", name));
                info!(knowledge_base = %id, "knowledge base created");
                Ok(id)
            }
            Err(err) => {
                warn!(error = %err, "failed to create knowledge base");
                self.controller
                    .announce(format!("Failed to create knowledge base: {}", failure_reason(&err)));
                Err(err)
            }
        }
    }

    pub async fn delete_knowledge_base(&mut self, id: &KnowledgeBaseId) -> Result<()> {
        if self.catalog.is_default(id) {
            return Err(Error::Validation("the default knowledge base cannot be deleted".to_string()));
        }

        match self.registry.delete(id).await {
            Ok(message) => {
                self.catalog.remove(id);
                let default = self.catalog.default_id().clone();
                self.controller.context_mut().select_knowledge_base(default);
                let message = message.unwrap_or_else(|| format!("Deleted knowledge base: {}", id));
                self.controller.announce(message);
                info!(knowledge_base = %id, "knowledge base deleted");
                Ok(())
            }
            Err(err) => {
                warn!(knowledge_base = %id, error = %err, "failed to delete knowledge base");
                self.controller
                    .announce(format!("Failed to delete knowledge base: {}", failure_reason(&err)));
                Err(err)
            }
        }
    }

    /// Send files to the selected knowledge base and report the service's
    /// status text in the transcript
    pub async fn upload(&mut self, paths: &[PathBuf]) -> Result<String> {
        if paths.is_empty() {
            return Err(Error::Validation("no files selected".to_string()));
        }

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(UploadFile::from_path(path).await?);
        }

        let listing: Vec<String> = files.iter().map(UploadFile::describe).collect();
        self.controller.announce(format!("Selected files:\n{}", listing.join("\n")));

        let knowledge_base = self.controller.context().knowledge_base().clone();
        match self.ingestion.upload(files, &knowledge_base, &self.upload_tag).await {
            Ok(status) => {
                info!(knowledge_base = %knowledge_base, files = paths.len(), "upload finished");
                self.controller.announce(status.clone());
                Ok(status)
            }
            Err(err) => {
                warn!(knowledge_base = %knowledge_base, error = %err, "upload failed");
                self.controller.announce(UPLOAD_FAILED_TEXT);
                Err(err)
            }
        }
    }
}

fn failure_reason(err: &Error) -> String {
    match err {
        Error::Service(message) | Error::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}
