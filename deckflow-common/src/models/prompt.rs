// File: deckflow-common/src/models/prompt.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured form of one submitted message. Built fresh for every prompt and
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub event_name: String,
    pub event_date: String,
    pub event_location: String,
    pub salesperson_name: String,
    /// In prompt order; duplicates are kept, empty names never appear.
    pub products: Vec<String>,
}

/// The five fields a prompt must supply, in the order they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequiredField {
    EventName,
    EventDate,
    EventLocation,
    SalespersonName,
    Products,
}

impl RequiredField {
    pub const ALL: [RequiredField; 5] = [
        RequiredField::EventName,
        RequiredField::EventDate,
        RequiredField::EventLocation,
        RequiredField::SalespersonName,
        RequiredField::Products,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::EventName => "Event Name",
            RequiredField::EventDate => "Event Date",
            RequiredField::EventLocation => "Event Location",
            RequiredField::SalespersonName => "Salesperson Name",
            RequiredField::Products => "Products",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl PromptRequest {
    fn has(&self, field: RequiredField) -> bool {
        match field {
            RequiredField::EventName => !self.event_name.trim().is_empty(),
            RequiredField::EventDate => !self.event_date.trim().is_empty(),
            RequiredField::EventLocation => !self.event_location.trim().is_empty(),
            RequiredField::SalespersonName => !self.salesperson_name.trim().is_empty(),
            RequiredField::Products => !self.products.is_empty(),
        }
    }

    /// Missing fields in canonical order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .iter()
            .copied()
            .filter(|field| !self.has(*field))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}
