// File: deckflow-core/src/services/approval_gate.rs

use deckflow_common::models::{EntryId, ExtractionResult, ProductContent};
use thiserror::Error;
use tracing::debug;

/// Reasons the gate refuses an operation. None of them change the gate's state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("an extraction is already awaiting approval")]
    AlreadyPending,
    #[error("nothing is awaiting approval")]
    NothingPending,
    #[error("an edit is in progress; save or cancel it first")]
    EditInProgress,
    #[error("no edit is open")]
    NoEditOpen,
    #[error("product index {index} is out of range ({count} product(s))")]
    IndexOutOfRange { index: usize, count: usize },
    #[error("product name cannot change from '{expected}' to '{actual}'")]
    ProductNameChanged { expected: String, actual: String },
}

/// The extraction result waiting on the user, plus the log entry that shows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingApproval {
    pub entry_id: EntryId,
    pub result: ExtractionResult,
}

/// Working copy of one product while the user edits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingSession {
    pub index: usize,
    pub draft: ProductContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Approved(PendingApproval),
    Rejected(PendingApproval),
}

impl Resolution {
    pub fn into_pending(self) -> PendingApproval {
        match self {
            Resolution::Approved(p) | Resolution::Rejected(p) => p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Pending,
    Editing,
}

/// Holds at most one extraction result awaiting approval.
#[derive(Debug, Default)]
pub struct ApprovalGate {
    pending: Option<PendingApproval>,
    editing: Option<EditingSession>,
}

impl ApprovalGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        match (&self.pending, &self.editing) {
            (None, _) => GateState::Idle,
            (Some(_), None) => GateState::Pending,
            (Some(_), Some(_)) => GateState::Editing,
        }
    }

    pub fn pending(&self) -> Option<&PendingApproval> {
        self.pending.as_ref()
    }

    pub fn editing(&self) -> Option<&EditingSession> {
        self.editing.as_ref()
    }

    pub fn open(&mut self, entry_id: EntryId, result: ExtractionResult) -> Result<(), GateError> {
        if self.pending.is_some() {
            return Err(GateError::AlreadyPending);
        }
        debug!("Approval pending for entry {} ({} product(s))", entry_id, result.count());
        self.pending = Some(PendingApproval { entry_id, result });
        Ok(())
    }

    /// Opens a working copy of the product at `index` and returns it.
    pub fn begin_edit(&mut self, index: usize) -> Result<&ProductContent, GateError> {
        let pending = self.pending.as_ref().ok_or(GateError::NothingPending)?;
        if self.editing.is_some() {
            return Err(GateError::EditInProgress);
        }
        let product = pending.result.product(index).ok_or(GateError::IndexOutOfRange {
            index,
            count: pending.result.count(),
        })?;
        let session = self.editing.insert(EditingSession {
            index,
            draft: product.clone(),
        });
        Ok(&session.draft)
    }

    pub fn draft_mut(&mut self) -> Result<&mut ProductContent, GateError> {
        self.editing
            .as_mut()
            .map(|session| &mut session.draft)
            .ok_or(GateError::NoEditOpen)
    }

    /// Writes `content` over the slot being edited and closes the edit.
    pub fn save_edit(&mut self, content: ProductContent) -> Result<&PendingApproval, GateError> {
        let session = self.editing.as_ref().ok_or(GateError::NoEditOpen)?;
        if content.product_name() != session.draft.product_name() {
            return Err(GateError::ProductNameChanged {
                expected: session.draft.product_name().to_string(),
                actual: content.product_name().to_string(),
            });
        }
        let index = session.index;
        let pending = self.pending.as_mut().ok_or(GateError::NothingPending)?;
        pending.result.replace(index, content);
        self.editing = None;
        debug!("Saved edit of product {} for entry {}", index, pending.entry_id);
        Ok(pending)
    }

    /// Saves the working copy as it currently stands.
    pub fn save_draft(&mut self) -> Result<&PendingApproval, GateError> {
        let draft = self
            .editing
            .as_ref()
            .map(|session| session.draft.clone())
            .ok_or(GateError::NoEditOpen)?;
        self.save_edit(draft)
    }

    pub fn cancel_edit(&mut self) -> Result<(), GateError> {
        self.editing.take().map(|_| ()).ok_or(GateError::NoEditOpen)
    }

    /// Settles the pending result. The gate is idle afterwards.
    pub fn resolve(&mut self, approved: bool) -> Result<Resolution, GateError> {
        if self.editing.is_some() {
            return Err(GateError::EditInProgress);
        }
        let pending = self.pending.take().ok_or(GateError::NothingPending)?;
        Ok(if approved {
            Resolution::Approved(pending)
        } else {
            Resolution::Rejected(pending)
        })
    }
}
