// File: deckflow-core/src/services/session.rs

use std::sync::Arc;
use std::time::Duration;

use deckflow_common::models::{
    Attachment, ConversationEntry, EntryId, JobId, ProductContent, Sender,
};
use deckflow_common::traits::GenerationService;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::api::DeckApiClient;
use crate::config::DeckflowConfig;
use crate::extraction::ContentExtractionClient;
use crate::prompt::{clean_text, validate_message, PromptInterpreter, TextIssue};
use crate::services::approval_gate::{
    ApprovalGate, EditingSession, GateError, GateState, PendingApproval,
};
use crate::services::conversation_log::{ConversationLog, LogError};
use crate::services::generation_coordinator::GenerationCoordinator;
use crate::tasks::job_poller::{JobOutcome, PollEvent};
use crate::Error;

const TITLE_CHARS: usize = 50;
const EVENT_CHANNEL_CAPACITY: usize = 8;

pub const GENERATING_MESSAGE: &str = "Generating your presentation. This can take a minute or two...";
pub const GENERIC_FAILURE: &str = "The presentation could not be generated. Please try again.";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("a request is still in progress; wait for it to finish")]
    Busy,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error(transparent)]
    Gate(#[from] GateError),
    #[error(transparent)]
    Log(#[from] LogError),
    #[error("no generation in progress for job {0}")]
    UnknownJob(JobId),
    #[error("job status channel closed")]
    ChannelClosed,
}

/// What a call to [`DeckSession::send_prompt`] led to. Every variant names
/// the system entry that reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    AwaitingApproval(EntryId),
    MissingDetails { entry: EntryId, missing: Vec<&'static str> },
    MessageTooLong(EntryId),
    ExtractionFailed(EntryId),
}

/// Outcome of [`DeckSession::approve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    Generating { job_id: JobId, entry: EntryId },
    SubmissionFailed(EntryId),
}

#[derive(Debug)]
struct ActiveGeneration {
    job_id: JobId,
    marker: EntryId,
}

/// One conversation: prompt, review, approval and generation, in that order.
pub struct DeckSession {
    log: ConversationLog,
    interpreter: PromptInterpreter,
    extraction: ContentExtractionClient,
    gate: ApprovalGate,
    coordinator: GenerationCoordinator,
    pending_prompt: Option<String>,
    generating: Option<ActiveGeneration>,
    title: Option<String>,
}

impl DeckSession {
    /// Creates a session and the receiver its job poller reports on. Feed
    /// every received event back through [`apply_poll_event`](Self::apply_poll_event).
    pub fn new(
        extraction: ContentExtractionClient,
        generation: Arc<dyn GenerationService>,
        poll_interval: Duration,
    ) -> (Self, mpsc::Receiver<PollEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let session = Self {
            log: ConversationLog::with_greeting(),
            interpreter: PromptInterpreter::new(),
            extraction,
            gate: ApprovalGate::new(),
            coordinator: GenerationCoordinator::new(generation, tx).with_poll_interval(poll_interval),
            pending_prompt: None,
            generating: None,
            title: None,
        };
        (session, rx)
    }

    /// A session talking to the HTTP backend described by `config`.
    pub fn connect(config: &DeckflowConfig) -> Result<(Self, mpsc::Receiver<PollEvent>), Error> {
        let api = Arc::new(DeckApiClient::new(config)?);
        let extraction = ContentExtractionClient::new(api.clone(), api.clone())
            .with_config(config.extraction.clone())
            .with_probe_timeout(config.probe_timeout);
        Ok(Self::new(extraction, api, config.poll_interval))
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        self.log.entries()
    }

    pub fn entry(&self, id: EntryId) -> Option<&ConversationEntry> {
        self.log.get(id)
    }

    /// First user message, shortened for display.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn pending(&self) -> Option<&PendingApproval> {
        self.gate.pending()
    }

    pub fn editing(&self) -> Option<&EditingSession> {
        self.gate.editing()
    }

    pub fn active_job(&self) -> Option<&JobId> {
        self.generating.as_ref().map(|g| &g.job_id)
    }

    /// A new prompt is accepted only when nothing is awaiting approval or
    /// being generated.
    pub fn can_send(&self) -> bool {
        self.gate.state() == GateState::Idle && self.generating.is_none()
    }

    pub fn can_resolve(&self) -> bool {
        self.gate.state() == GateState::Pending
    }

    pub async fn send_prompt(&mut self, text: &str) -> Result<SendOutcome, SessionError> {
        if !self.can_send() {
            return Err(SessionError::Busy);
        }
        match validate_message(text) {
            Err(TextIssue::Empty) => return Err(SessionError::EmptyMessage),
            Err(issue @ TextIssue::TooLong { .. }) => {
                self.record_user(text);
                let entry = self.system(format!("{}. Please shorten your request.", issue));
                return Ok(SendOutcome::MessageTooLong(entry));
            }
            Ok(()) => {}
        }

        self.record_user(text);

        let request = self.interpreter.interpret(&clean_text(text));
        let check = self.interpreter.check(&request);
        if !check.is_ok() {
            let entry = self.system(check.guidance_message());
            return Ok(SendOutcome::MissingDetails {
                entry,
                missing: check.missing_labels(),
            });
        }

        info!(
            "Extracting content for '{}' ({} product(s))",
            request.event_name,
            request.products.len()
        );
        let result = match self.extraction.extract(&request.products).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Extraction failed: {}", e);
                let entry = self.system(format!(
                    "I couldn't extract the product content: {}. Please try again.",
                    e
                ));
                return Ok(SendOutcome::ExtractionFailed(entry));
            }
        };

        let mut body = format!(
            "Here is the content for {} product(s) for {} on {} in {}, presented by {}. \
             Review or edit it, then approve to generate the presentation.",
            result.count(),
            request.event_name,
            request.event_date,
            request.event_location,
            request.salesperson_name
        );
        if result.is_simulated() {
            body.push_str(" The content service is unavailable, so this is sample content.");
        }
        let entry = self.log.append(
            Sender::System,
            body,
            vec![Attachment::Extraction(result.clone()), Attachment::ApprovalRequest],
        );
        self.gate.open(entry, result)?;
        self.pending_prompt = Some(text.to_string());
        Ok(SendOutcome::AwaitingApproval(entry))
    }

    /// Approves the pending content and submits it, exactly once.
    pub async fn approve(&mut self) -> Result<ApproveOutcome, SessionError> {
        let pending = self.gate.resolve(true)?.into_pending();
        let prompt = self.pending_prompt.take().unwrap_or_default();

        match self.coordinator.submit(&prompt, pending.result.products()).await {
            Ok(job_id) => {
                let entry = self.log.append(
                    Sender::System,
                    GENERATING_MESSAGE,
                    vec![Attachment::GenerationInProgress { job_id: job_id.clone() }],
                );
                self.generating = Some(ActiveGeneration {
                    job_id: job_id.clone(),
                    marker: entry,
                });
                Ok(ApproveOutcome::Generating { job_id, entry })
            }
            Err(e) => {
                let entry = self.system(format!(
                    "I couldn't start generating the presentation: {}. Please try again.",
                    e
                ));
                Ok(ApproveOutcome::SubmissionFailed(entry))
            }
        }
    }

    pub fn reject(&mut self) -> Result<EntryId, SessionError> {
        self.gate.resolve(false)?;
        self.pending_prompt = None;
        Ok(self.system(
            "Okay, I won't generate this presentation. Send a new request whenever you're ready.",
        ))
    }

    pub fn begin_edit(&mut self, index: usize) -> Result<&ProductContent, SessionError> {
        Ok(self.gate.begin_edit(index)?)
    }

    pub fn draft_mut(&mut self) -> Result<&mut ProductContent, SessionError> {
        Ok(self.gate.draft_mut()?)
    }

    pub fn save_edit(&mut self, content: ProductContent) -> Result<(), SessionError> {
        let pending = self.gate.save_edit(content)?;
        let (entry, result) = (pending.entry_id, pending.result.clone());
        self.log.replace_extraction(entry, result)?;
        Ok(())
    }

    pub fn save_draft(&mut self) -> Result<(), SessionError> {
        let pending = self.gate.save_draft()?;
        let (entry, result) = (pending.entry_id, pending.result.clone());
        self.log.replace_extraction(entry, result)?;
        Ok(())
    }

    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        Ok(self.gate.cancel_edit()?)
    }

    /// Settles the in-progress entry with the poller's verdict.
    pub fn apply_poll_event(&mut self, event: PollEvent) -> Result<EntryId, SessionError> {
        let active = match self.generating.take() {
            Some(active) if active.job_id == event.job_id => active,
            other => {
                self.generating = other;
                return Err(SessionError::UnknownJob(event.job_id));
            }
        };
        self.coordinator.finish(&active.job_id);

        let (body, attachments) = match event.outcome {
            JobOutcome::Completed { artifact } => (
                "Your presentation is ready to download.".to_string(),
                vec![Attachment::Download { artifact }],
            ),
            JobOutcome::Failed { message: Some(message) } => (
                format!("Presentation generation failed: {}", message),
                Vec::new(),
            ),
            JobOutcome::Failed { message: None } => (GENERIC_FAILURE.to_string(), Vec::new()),
            JobOutcome::PollingError { message } => (
                format!("I lost track of the presentation job ({}). Please try again.", message),
                Vec::new(),
            ),
        };
        self.log.settle_progress(active.marker, body, attachments)?;
        Ok(active.marker)
    }

    /// Waits for the running job's terminal event and applies it.
    pub async fn wait_for_generation(
        &mut self,
        events: &mut mpsc::Receiver<PollEvent>,
    ) -> Result<EntryId, SessionError> {
        let event = events.recv().await.ok_or(SessionError::ChannelClosed)?;
        self.apply_poll_event(event)
    }

    /// The first user message names the session, even one that is rejected.
    fn record_user(&mut self, text: &str) -> EntryId {
        let id = self.log.append(Sender::User, text, Vec::new());
        if self.title.is_none() {
            self.title = Some(make_title(text));
        }
        id
    }

    fn system(&mut self, body: impl Into<String>) -> EntryId {
        self.log.append(Sender::System, body, Vec::new())
    }
}

fn make_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > TITLE_CHARS {
        let head: String = trimmed.chars().take(TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}
