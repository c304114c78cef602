//! Turning a chat message into a [`PromptRequest`](deckflow_common::models::PromptRequest).

pub mod interpreter;
pub mod text;

pub use interpreter::{CompletenessCheck, PromptInterpreter};
pub use text::{clean_text, validate_message, TextIssue, MAX_MESSAGE_CHARS};
