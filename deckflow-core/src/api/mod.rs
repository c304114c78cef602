pub mod client;

pub use client::DeckApiClient;
