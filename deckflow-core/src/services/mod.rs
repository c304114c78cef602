pub mod approval_gate;
pub mod conversation_log;
pub mod generation_coordinator;
pub mod session;

pub use approval_gate::{ApprovalGate, EditingSession, GateError, GateState, PendingApproval, Resolution};
pub use conversation_log::{ConversationLog, LogError};
pub use generation_coordinator::GenerationCoordinator;
pub use session::{ApproveOutcome, DeckSession, SendOutcome, SessionError};
