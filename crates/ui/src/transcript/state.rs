use indexmap::IndexMap;
use tokio::sync::mpsc;

use crate::transcript::entry::{MessageId, MessageRecord, Phase, Role};

/// Notification sent to subscribers after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscriptChange {
    Appended(MessageId),
    Updated(MessageId),
    /// Everything after `after` was removed
    Truncated { after: MessageId, removed: usize },
    Cleared,
}

/// Ordered, id-addressable conversation history.
///
/// This is the only place conversation state lives. Renderers read it and
/// subscribe to [`TranscriptChange`]s; nothing reads rendered output back.
#[derive(Debug, Default)]
pub struct TranscriptStore {
    records: IndexMap<MessageId, MessageRecord>,
    subscribers: Vec<mpsc::UnboundedSender<TranscriptChange>>,
}

impl TranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new record and return its id
    pub fn append(&mut self, role: Role, content: impl Into<String>, phase: Phase) -> MessageId {
        self.push(MessageRecord::new(role, content, phase))
    }

    /// Append a prebuilt record; its `created_seq` becomes the current maximum plus one
    pub fn push(&mut self, mut record: MessageRecord) -> MessageId {
        record.created_seq = self.records.last().map_or(0, |(_, last)| last.created_seq) + 1;
        let id = record.id;
        self.records.insert(id, record);
        self.notify(TranscriptChange::Appended(id));
        id
    }

    /// Merge the provided fields into the record with this id.
    ///
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub fn update(&mut self, id: MessageId, content: Option<String>, phase: Option<Phase>) -> bool {
        let Some(record) = self.records.get_mut(&id) else {
            return false;
        };

        if let Some(content) = content {
            record.content = content;
        }
        if let Some(phase) = phase {
            record.phase = phase;
        }
        self.notify(TranscriptChange::Updated(id));
        true
    }

    /// Remove every record positioned after `id`; returns how many were removed
    pub fn truncate_after(&mut self, id: MessageId) -> usize {
        let Some(index) = self.records.get_index_of(&id) else {
            return 0;
        };

        let removed = self.records.len() - (index + 1);
        if removed > 0 {
            self.records.truncate(index + 1);
            self.notify(TranscriptChange::Truncated { after: id, removed });
        }
        removed
    }

    /// Nearest user record strictly earlier than `id`
    pub fn find_nearest_prior_user(&self, id: MessageId) -> Option<MessageId> {
        let index = self.records.get_index_of(&id)?;
        self.records
            .values()
            .take(index)
            .rev()
            .find(|record| record.role == Role::User)
            .map(|record| record.id)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.notify(TranscriptChange::Cleared);
    }

    pub fn get(&self, id: MessageId) -> Option<&MessageRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl DoubleEndedIterator<Item = &MessageRecord> {
        self.records.values()
    }

    pub fn last(&self) -> Option<&MessageRecord> {
        self.records.last().map(|(_, record)| record)
    }

    /// Most recent record with the given role
    pub fn last_of_role(&self, role: Role) -> Option<&MessageRecord> {
        self.records.values().rev().find(|record| record.role == role)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records currently pending or revealing
    pub fn in_flight(&self) -> Vec<MessageId> {
        self.records
            .values()
            .filter(|record| record.phase.is_in_flight())
            .map(|record| record.id)
            .collect()
    }

    /// Receive a [`TranscriptChange`] after every mutation
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TranscriptChange> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, change: TranscriptChange) {
        self.subscribers.retain(|tx| tx.send(change).is_ok());
    }
}
