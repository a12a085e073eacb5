pub mod app;
pub mod components;
pub mod context;
pub mod event_handler;
pub mod layout;
pub mod lifecycle;
pub mod reveal;
pub mod slash;
pub mod state;
pub mod surface;
pub mod theme;
pub mod transcript;

pub use app::App;
pub use context::SessionContext;
pub use event_handler::{EventHandler, KeyAction};
pub use lifecycle::{Controller, FAILURE_TEXT, LifecycleEvent, LifecycleState, Outcome, TerminalPhases};
pub use reveal::{ChunkStrategy, FixedChunks, RandomChunks, RevealHandle, RevealScheduler};
pub use state::{AppState, InputState};
pub use surface::{Affordances, Intent, IntentOutcome, PrimaryAction, Surface, WELCOME_TEXT};
pub use theme::Theme;
pub use transcript::{MessageId, MessageRecord, Phase, Role, TranscriptChange, TranscriptStore, TranscriptView};
