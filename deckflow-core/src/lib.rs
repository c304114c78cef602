// src/lib.rs

pub mod config;
pub mod prompt;
pub mod extraction;
pub mod services;
pub mod tasks;
pub mod api;

pub use deckflow_common::error::Error;
pub use config::DeckflowConfig;
pub use api::DeckApiClient;
pub use services::session::{ApproveOutcome, DeckSession, SendOutcome, SessionError};
