// File: deckflow-common/src/models/conversation.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::generation::{ArtifactRef, JobId};
use crate::models::product::ExtractionResult;

/// Identifier handed out by the conversation log; strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attachment {
    Extraction(ExtractionResult),
    /// Placeholder shown while a generation job is being polled.
    GenerationInProgress { job_id: JobId },
    Download { artifact: ArtifactRef },
    ApprovalRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: EntryId,
    pub sender: Sender,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl ConversationEntry {
    pub fn extraction(&self) -> Option<&ExtractionResult> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::Extraction(result) => Some(result),
            _ => None,
        })
    }

    pub fn download(&self) -> Option<&ArtifactRef> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::Download { artifact } => Some(artifact),
            _ => None,
        })
    }

    pub fn in_progress_job(&self) -> Option<&JobId> {
        self.attachments.iter().find_map(|a| match a {
            Attachment::GenerationInProgress { job_id } => Some(job_id),
            _ => None,
        })
    }

    pub fn requests_approval(&self) -> bool {
        self.attachments
            .iter()
            .any(|a| matches!(a, Attachment::ApprovalRequest))
    }
}
