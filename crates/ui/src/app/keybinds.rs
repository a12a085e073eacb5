use super::App;
use crate::event_handler::{EventHandler, KeyAction};
use crate::state::NoticeLevel;
use crate::surface::{Intent, IntentOutcome};

pub async fn handle_event(app: &mut App, event: crossterm::event::Event) {
    let busy = !app.surface.controller().is_idle();
    if let Some(action) = EventHandler::handle_event(&event, &mut app.state, busy) {
        handle_action(app, action).await;
    }
}

pub async fn handle_action(app: &mut App, action: KeyAction) {
    match action {
        KeyAction::Primary { message } => {
            app.state.scroll_to_bottom();
            apply(app, Intent::Primary(message));
        }
        KeyAction::Interrupt => {
            if apply(app, Intent::Interrupt) == Some(IntentOutcome::Interrupted) {
                app.state.notify(NoticeLevel::Warning, "Reply interrupted");
            }
        }
        KeyAction::CopyLast | KeyAction::SlashCommandCopy => match apply(app, Intent::CopyLast) {
            Some(IntentOutcome::Copied(_)) => app.state.notify(NoticeLevel::Info, "Copied last reply"),
            _ => app.state.notify(NoticeLevel::Warning, "Nothing to copy right now"),
        },
        KeyAction::RegenerateLast | KeyAction::SlashCommandRegen => {
            app.state.scroll_to_bottom();
            if !matches!(apply(app, Intent::RegenerateLast), Some(IntentOutcome::Regenerated(_))) {
                app.state.notify(NoticeLevel::Warning, "Nothing to regenerate right now");
            }
        }
        KeyAction::ToggleKnowledge => {
            let enabled = !app.surface.controller().context().knowledge_mode();
            apply(app, Intent::SetKnowledgeMode(enabled));
        }
        KeyAction::SlashCommandRag { enabled } => {
            apply(app, Intent::SetKnowledgeMode(enabled));
        }
        KeyAction::NewConversation | KeyAction::SlashCommandNew => {
            app.state.scroll_to_bottom();
            if let Some(IntentOutcome::ConversationReset(id)) = apply(app, Intent::NewConversation) {
                app.state.notify(NoticeLevel::Info, format!("New conversation {}", id));
            }
        }
        KeyAction::SlashCommandKbList => app.list_knowledge_bases().await,
        KeyAction::SlashCommandKbUse { id } => app.use_knowledge_base(id),
        KeyAction::SlashCommandKbCreate { name, description } => app.create_knowledge_base(name, description).await,
        KeyAction::SlashCommandKbDelete { id } => app.delete_knowledge_base(id).await,
        KeyAction::SlashCommandUpload { paths } => app.upload_files(paths).await,
        KeyAction::SlashCommandHelp => app.show_help(),
        KeyAction::InvalidCommand { input } => {
            app.state
                .notify(NoticeLevel::Warning, format!("Unknown command: {} (try /help)", input));
        }
        KeyAction::ScrollUp | KeyAction::ScrollDown | KeyAction::NavigateHistory => {}
        KeyAction::Quit => {
            let _ = app.surface.apply(Intent::Interrupt);
            app.state.should_exit = true;
        }
    }
}

/// Apply an intent, reporting surface errors as a notice
fn apply(app: &mut App, intent: Intent) -> Option<IntentOutcome> {
    match app.surface.apply(intent) {
        Ok(outcome) => Some(outcome),
        Err(err) => {
            tracing::warn!(error = %err, "intent failed");
            app.state.notify(NoticeLevel::Error, err.to_string());
            None
        }
    }
}
