// File: deckflow-core/src/services/generation_coordinator.rs

use std::sync::Arc;
use std::time::Duration;

use deckflow_common::models::{JobId, ProductContent};
use deckflow_common::traits::GenerationService;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::config::DEFAULT_POLL_INTERVAL;
use crate::tasks::job_poller::{spawn_job_poller, JobPollerHandle, PollEvent};
use crate::Error;

/// Submits approved content for rendering and supervises the resulting job.
pub struct GenerationCoordinator {
    service: Arc<dyn GenerationService>,
    poll_interval: Duration,
    events: mpsc::Sender<PollEvent>,
    poller: Option<JobPollerHandle>,
}

impl GenerationCoordinator {
    pub fn new(service: Arc<dyn GenerationService>, events: mpsc::Sender<PollEvent>) -> Self {
        Self {
            service,
            poll_interval: DEFAULT_POLL_INTERVAL,
            events,
            poller: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// One submission; the returned job is supervised straight away.
    pub async fn submit(&mut self, prompt: &str, products: &[ProductContent]) -> Result<JobId, Error> {
        let job_id = match self.service.submit(prompt, products).await {
            Ok(id) => id,
            Err(e) => {
                error!("Deck submission failed: {}", e);
                return Err(e);
            }
        };
        info!("Submitted deck with {} product(s) as job {}", products.len(), job_id);
        self.supervise(job_id.clone());
        Ok(job_id)
    }

    /// Called once the terminal event for `job_id` has been handled.
    pub fn finish(&mut self, job_id: &JobId) {
        if self.poller.as_ref().is_some_and(|p| p.job_id() == job_id) {
            self.poller = None;
        }
    }

    pub fn cancel(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.cancel();
        }
    }

    fn supervise(&mut self, job_id: JobId) {
        // One loop per job: a previous poller is stopped before the next starts.
        self.cancel();
        self.poller = Some(spawn_job_poller(
            self.service.clone(),
            job_id,
            self.poll_interval,
            self.events.clone(),
        ));
    }
}

impl Drop for GenerationCoordinator {
    fn drop(&mut self) {
        self.cancel();
    }
}
