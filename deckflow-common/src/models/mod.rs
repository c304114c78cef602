// File: deckflow-common/src/models/mod.rs
pub mod prompt;
pub mod product;
pub mod generation;
pub mod conversation;

pub use prompt::{PromptRequest, RequiredField};
pub use product::{
    ContentSection, ExtractionConfig, ExtractionResult, ExtractionStatus, ImageLayout, ProductContent,
};
pub use generation::{ArtifactRef, GenerationJob, JobId, JobStatus, JobStatusReport};
pub use conversation::{Attachment, ConversationEntry, EntryId, Sender};
