// File: deckflow-core/tests/test_utils/helpers.rs

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use deckflow_common::models::{
    ArtifactRef, ExtractionConfig, ExtractionResult, ExtractionStatus, ImageLayout, JobId,
    JobStatusReport, ProductContent,
};
use deckflow_common::traits::{ExtractionService, GenerationService, LivenessProbe};
use deckflow_core::extraction::ContentExtractionClient;
use deckflow_core::services::DeckSession;
use deckflow_core::tasks::job_poller::PollEvent;
use deckflow_core::Error;
use tokio::sync::mpsc;

pub const FULL_PROMPT: &str = "Generate a PowerPoint for the Open House Event on August 11, 2025 \
in Dubai featuring salesperson Jasmeet Kaur and slides on the products: AI Photobooth, \
Kinetic Ceiling, and Kinetic Blooming Flower.";

pub const TEST_POLL_INTERVAL: Duration = Duration::from_millis(10);

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Probe with a fixed answer.
pub struct StaticProbe(pub bool);

#[async_trait]
impl LivenessProbe for StaticProbe {
    async fn check(&self) -> Result<bool, Error> {
        Ok(self.0)
    }
}

/// Probe that answers "up", but only after `delay`.
pub struct SlowProbe(pub Duration);

#[async_trait]
impl LivenessProbe for SlowProbe {
    async fn check(&self) -> Result<bool, Error> {
        tokio::time::sleep(self.0).await;
        Ok(true)
    }
}

/// Live-looking extraction: one product per name with a recognisable overview.
#[derive(Default)]
pub struct EchoExtraction {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ExtractionService for EchoExtraction {
    async fn extract(
        &self,
        product_names: &[String],
        _config: &ExtractionConfig,
    ) -> Result<ExtractionResult, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let products = product_names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut content = ProductContent::new(name.as_str(), ImageLayout::for_position(i));
                content.overview = format!("Live overview of {}", name);
                content
            })
            .collect();
        Ok(ExtractionResult::new(products, ExtractionStatus::Success))
    }
}

/// One scripted answer to a status query.
#[derive(Debug, Clone)]
pub enum StatusStep {
    Report(JobStatusReport),
    Unreachable,
}

/// Generation backend that records submissions and plays back status steps.
/// Once the script runs out every query answers `processing`.
pub struct ScriptedGeneration {
    pub fail_submit: bool,
    pub submissions: Mutex<Vec<(String, Vec<ProductContent>)>>,
    pub status_queries: AtomicUsize,
    steps: Mutex<VecDeque<StatusStep>>,
}

impl ScriptedGeneration {
    pub fn new(steps: Vec<StatusStep>) -> Self {
        Self {
            fail_submit: false,
            submissions: Mutex::new(Vec::new()),
            status_queries: AtomicUsize::new(0),
            steps: Mutex::new(steps.into()),
        }
    }

    pub fn completing_with(artifact: &str) -> Self {
        Self::new(vec![
            StatusStep::Report(JobStatusReport::pending()),
            StatusStep::Report(JobStatusReport::processing("Creating slides")),
            StatusStep::Report(JobStatusReport::completed(ArtifactRef::new(artifact))),
        ])
    }

    pub fn rejecting_submissions() -> Self {
        Self {
            fail_submit: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }

    pub fn queries(&self) -> usize {
        self.status_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationService for ScriptedGeneration {
    async fn submit(&self, prompt: &str, products: &[ProductContent]) -> Result<JobId, Error> {
        if self.fail_submit {
            return Err(Error::Service {
                status: 500,
                message: "Failed to start PPT generation".into(),
            });
        }
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push((prompt.to_string(), products.to_vec()));
        Ok(JobId::new(format!("job-{}", submissions.len())))
    }

    async fn job_status(&self, _job_id: &JobId) -> Result<JobStatusReport, Error> {
        self.status_queries.fetch_add(1, Ordering::SeqCst);
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(StatusStep::Report(report)) => Ok(report),
            Some(StatusStep::Unreachable) => {
                Err(Error::Unavailable("connection refused".into()))
            }
            None => Ok(JobStatusReport::processing("Still working")),
        }
    }
}

/// Session whose extraction service is down, so content is simulated.
pub fn offline_session(
    generation: Arc<dyn GenerationService>,
) -> (DeckSession, mpsc::Receiver<PollEvent>) {
    let extraction = ContentExtractionClient::new(
        Arc::new(EchoExtraction::default()),
        Arc::new(StaticProbe(false)),
    );
    DeckSession::new(extraction, generation, TEST_POLL_INTERVAL)
}

/// Session backed by the echoing "live" extraction service.
pub fn online_session(
    extraction: Arc<dyn ExtractionService>,
    generation: Arc<dyn GenerationService>,
) -> (DeckSession, mpsc::Receiver<PollEvent>) {
    let client = ContentExtractionClient::new(extraction, Arc::new(StaticProbe(true)));
    DeckSession::new(client, generation, TEST_POLL_INTERVAL)
}
