use std::path::PathBuf;

/// Actions that can be triggered by key events
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// Enter: send the message, or interrupt while a reply is in flight
    Primary { message: String },
    /// Esc: interrupt the reply in flight
    Interrupt,
    /// Copy the latest assistant reply
    CopyLast,
    /// Ask the latest question again
    RegenerateLast,
    /// Flip knowledge-base mode
    ToggleKnowledge,
    /// Start a new conversation
    NewConversation,
    ScrollUp,
    ScrollDown,
    /// Navigate message history (handled internally by InputState)
    NavigateHistory,
    /// Slash command: start a new conversation
    SlashCommandNew,
    /// Slash command: list knowledge bases
    SlashCommandKbList,
    /// Slash command: switch knowledge base
    SlashCommandKbUse { id: String },
    /// Slash command: create a knowledge base
    SlashCommandKbCreate { name: String, description: String },
    /// Slash command: delete a knowledge base
    SlashCommandKbDelete { id: String },
    /// Slash command: turn knowledge-base mode on or off
    SlashCommandRag { enabled: bool },
    /// Slash command: upload files to the selected knowledge base
    SlashCommandUpload { paths: Vec<PathBuf> },
    SlashCommandCopy,
    SlashCommandRegen,
    SlashCommandHelp,
    /// A `/` command that did not parse
    InvalidCommand { input: String },
    /// Leave the application
    Quit,
}

impl KeyAction {
    /// Whether this action came from a slash command
    pub fn is_slash_command(&self) -> bool {
        matches!(
            self,
            KeyAction::SlashCommandNew
                | KeyAction::SlashCommandKbList
                | KeyAction::SlashCommandKbUse { .. }
                | KeyAction::SlashCommandKbCreate { .. }
                | KeyAction::SlashCommandKbDelete { .. }
                | KeyAction::SlashCommandRag { .. }
                | KeyAction::SlashCommandUpload { .. }
                | KeyAction::SlashCommandCopy
                | KeyAction::SlashCommandRegen
                | KeyAction::SlashCommandHelp
                | KeyAction::InvalidCommand { .. }
        )
    }
}
