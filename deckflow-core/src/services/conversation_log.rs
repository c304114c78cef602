// File: deckflow-core/src/services/conversation_log.rs

use chrono::Utc;
use deckflow_common::models::{
    Attachment, ConversationEntry, EntryId, ExtractionResult, Sender,
};
use thiserror::Error;
use tracing::trace;

pub const GREETING: &str = "Hi! Describe your event and the products you want to feature, \
and I'll prepare the slide content for your review.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogError {
    #[error("no conversation entry {0}")]
    UnknownEntry(EntryId),
    #[error("entry {0} does not carry the attachment being replaced")]
    NotApplicable(EntryId),
}

/// Ordered record of the exchange. Entries are only ever appended; the two
/// in-place updates are limited to the attachments that are still live.
#[derive(Debug)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    next_id: u64,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    /// An empty log. Sessions use [`with_greeting`](Self::with_greeting).
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_greeting() -> Self {
        let mut log = Self::new();
        log.append(Sender::System, GREETING, Vec::new());
        log
    }

    pub fn append(
        &mut self,
        sender: Sender,
        body: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> EntryId {
        let id = EntryId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(ConversationEntry {
            id,
            sender,
            body: body.into(),
            timestamp: Utc::now(),
            attachments,
        });
        trace!("Appended conversation entry {}", id);
        id
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&ConversationEntry> {
        self.position(id).map(|i| &self.entries[i])
    }

    /// Swaps the extraction result carried by entry `id` for an edited one.
    pub fn replace_extraction(
        &mut self,
        id: EntryId,
        result: ExtractionResult,
    ) -> Result<(), LogError> {
        let entry = self.entry_mut(id)?;
        let slot = entry
            .attachments
            .iter_mut()
            .find_map(|a| match a {
                Attachment::Extraction(existing) => Some(existing),
                _ => None,
            })
            .ok_or(LogError::NotApplicable(id))?;
        *slot = result;
        Ok(())
    }

    /// Turns the generation-in-progress entry `id` into its terminal entry.
    /// The entry keeps its id and position; body, timestamp and attachments
    /// are replaced.
    pub fn settle_progress(
        &mut self,
        id: EntryId,
        body: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Result<(), LogError> {
        let entry = self.entry_mut(id)?;
        if entry.in_progress_job().is_none() {
            return Err(LogError::NotApplicable(id));
        }
        entry.body = body.into();
        entry.timestamp = Utc::now();
        entry.attachments = attachments;
        Ok(())
    }

    fn position(&self, id: EntryId) -> Option<usize> {
        self.entries.binary_search_by_key(&id, |e| e.id).ok()
    }

    fn entry_mut(&mut self, id: EntryId) -> Result<&mut ConversationEntry, LogError> {
        let index = self.position(id).ok_or(LogError::UnknownEntry(id))?;
        Ok(&mut self.entries[index])
    }
}
