use std::collections::VecDeque;

/// Questions kept for Up/Down recall
const HISTORY_LIMIT: usize = 100;

/// The question being typed, plus recall of earlier questions.
///
/// `cursor` counts characters, not bytes, so multibyte input edits cleanly.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
    history: QuestionHistory,
}

/// Sent questions, oldest first, with the recall position
#[derive(Debug, Clone, Default)]
struct QuestionHistory {
    entries: VecDeque<String>,
    /// Index into `entries` while recalling
    position: Option<usize>,
    /// Unsent draft parked while recalling
    parked: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn offset(&self, chars: usize) -> usize {
        self.text.char_indices().nth(chars).map_or(self.text.len(), |(at, _)| at)
    }

    fn replace(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.text = text;
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        let Some(prev) = self.cursor.checked_sub(1) else {
            return;
        };
        let at = self.offset(prev);
        self.text.remove(at);
        self.cursor = prev;
    }

    /// Remove the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.offset(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.replace(String::new());
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Hand over the typed text and start a fresh line
    pub fn take(&mut self) -> String {
        self.history.stop_recall();
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn before_cursor(&self) -> &str {
        &self.text[..self.offset(self.cursor)]
    }

    pub fn after_cursor(&self) -> &str {
        &self.text[self.offset(self.cursor)..]
    }

    /// Record a sent question. Repeating the previous question adds nothing.
    pub fn remember(&mut self, question: String) {
        self.history.stop_recall();
        if self.history.entries.back() == Some(&question) {
            return;
        }
        if self.history.entries.len() == HISTORY_LIMIT {
            self.history.entries.pop_front();
        }
        self.history.entries.push_back(question);
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.entries.iter().map(String::as_str)
    }

    /// Step back to an older question; the draft is parked on the first step
    pub fn recall_older(&mut self) {
        let history = &mut self.history;
        let position = match history.position {
            Some(0) => return,
            Some(at) => at - 1,
            None if history.entries.is_empty() => return,
            None => {
                history.parked = Some(self.text.clone());
                history.entries.len() - 1
            }
        };
        history.position = Some(position);
        let recalled = history.entries[position].clone();
        self.replace(recalled);
    }

    /// Step toward newer questions; past the newest the parked draft returns
    pub fn recall_newer(&mut self) {
        let Some(at) = self.history.position else {
            return;
        };
        let next = at + 1;
        let text = if next < self.history.entries.len() {
            self.history.position = Some(next);
            self.history.entries[next].clone()
        } else {
            self.history.position = None;
            self.history.parked.take().unwrap_or_default()
        };
        self.replace(text);
    }

    pub fn is_recalling(&self) -> bool {
        self.history.position.is_some()
    }
}

impl QuestionHistory {
    fn stop_recall(&mut self) {
        self.position = None;
        self.parked = None;
    }
}
