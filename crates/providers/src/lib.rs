pub mod adapter;
pub mod ingest;
pub mod knowledge;
pub mod mock;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use adapter::{AnswerService, HttpAnswerService, ServiceBundle};
pub use ingest::{FileIngestion, HttpFileIngestion, MemoryFileIngestion};
pub use knowledge::{HttpKnowledgeBaseRegistry, KnowledgeBaseRegistry, MemoryKnowledgeBaseRegistry};
pub use mock::{MockResponse, ScriptedAnswerService};
pub use types::{
    AnswerMode, AnswerRequest, ApiEnvelope, KnowledgeBase, KnowledgeBaseId, NewKnowledgeBase, UploadFile,
};

pub use parlor_core::{Error, Result};
