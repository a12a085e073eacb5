mod parser;

pub use parser::parse_slash_command;

use crate::app::App;
use crate::state::NoticeLevel;
use crate::surface::{Intent, IntentOutcome};

use parlor_providers::KnowledgeBaseId;
use std::path::PathBuf;

pub const HELP_TEXT: &str = "Commands:
  /new                         start a new conversation
  /kb                          list knowledge bases
  /kb use <id>                 switch knowledge base
  /kb create <name> [desc]     create a knowledge base
  /kb delete <id>              delete a knowledge base
  /rag on|off                  answer from the selected knowledge base
  /upload <path>...            upload files to the selected knowledge base
  /copy                        copy the last reply
  /regen                       ask the last question again
  /quit                        leave
Keys: Enter send/interrupt, Esc interrupt, Ctrl+Y copy, Ctrl+R regenerate,
      Ctrl+K knowledge mode, Ctrl+N new conversation, PgUp/PgDn scroll";

impl App {
    /// Handle /kb and /kb list
    pub async fn list_knowledge_bases(&mut self) {
        self.surface_mut().refresh_knowledge_bases().await;

        let surface = self.surface();
        let selected = surface.controller().context().knowledge_base();
        let mut listing = String::from("Knowledge bases:");
        for base in surface.catalog().iter() {
            let marker = if &base.id == selected { "*" } else { " " };
            listing.push_str(&format!("\n {} {}  {}", marker, base.id, base.name));
            if !base.description.is_empty() {
                listing.push_str(&format!(" ({})", base.description));
            }
        }
        self.surface_mut().controller_mut().announce(listing);
    }

    /// Handle /kb use
    pub fn use_knowledge_base(&mut self, id: String) {
        let outcome = self.surface_mut().apply(Intent::SelectKnowledgeBase(KnowledgeBaseId::new(id.clone())));
        if !matches!(outcome, Ok(IntentOutcome::KnowledgeBaseSelected(_))) {
            self.state_mut()
                .notify(NoticeLevel::Warning, format!("Unknown knowledge base: {}", id));
        }
    }

    /// Handle /kb create
    pub async fn create_knowledge_base(&mut self, name: String, description: String) {
        if let Err(err) = self.surface_mut().create_knowledge_base(&name, &description).await {
            self.state_mut().notify(NoticeLevel::Error, err.to_string());
        }
    }

    /// Handle /kb delete
    pub async fn delete_knowledge_base(&mut self, id: String) {
        let id = KnowledgeBaseId::new(id);
        if let Err(err) = self.surface_mut().delete_knowledge_base(&id).await {
            self.state_mut().notify(NoticeLevel::Error, err.to_string());
        }
    }

    /// Handle /upload
    pub async fn upload_files(&mut self, paths: Vec<PathBuf>) {
        self.state_mut().notify(NoticeLevel::Info, "Uploading...");
        match self.surface_mut().upload(&paths).await {
            Ok(_) => self.state_mut().notify(NoticeLevel::Info, "Upload finished"),
            Err(err) => self.state_mut().notify(NoticeLevel::Error, err.to_string()),
        }
    }

    /// Handle /help
    pub fn show_help(&mut self) {
        self.surface_mut().controller_mut().announce(HELP_TEXT);
    }
}
