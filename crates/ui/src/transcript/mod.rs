//! Transcript store: the ordered message records of the current conversation
//! and their terminal projection.

mod entry;
mod renderer;
mod state;

pub use entry::{MessageId, MessageRecord, Phase, Role};
pub use renderer::TranscriptView;
pub use state::{TranscriptChange, TranscriptStore};
