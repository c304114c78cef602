// deckflow-core/src/tasks/job_poller.rs

use std::sync::Arc;
use std::time::Duration;

use deckflow_common::models::{ArtifactRef, GenerationJob, JobId, JobStatus};
use deckflow_common::traits::GenerationService;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// How a supervised job ended, from the session's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { artifact: ArtifactRef },
    /// The job reached `failed`, or `completed` with nothing to download.
    Failed { message: Option<String> },
    /// A status query itself failed; the job's fate is unknown.
    PollingError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollEvent {
    pub job_id: JobId,
    pub outcome: JobOutcome,
}

/// Handle to a running poller. Dropping it leaves the task running; call
/// [`cancel`](Self::cancel) to stop it.
#[derive(Debug)]
pub struct JobPollerHandle {
    job_id: JobId,
    handle: JoinHandle<()>,
}

impl JobPollerHandle {
    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            debug!("Cancelling poller for job {}", self.job_id);
        }
        self.handle.abort();
    }
}

/// Spawns a task that queries `job_id` every `period` (first query after one
/// period) until the job is terminal or a query fails, then sends exactly one
/// [`PollEvent`] on `events` and exits.
pub fn spawn_job_poller(
    service: Arc<dyn GenerationService>,
    job_id: JobId,
    period: Duration,
    events: mpsc::Sender<PollEvent>,
) -> JobPollerHandle {
    let mut job = GenerationJob::submitted(job_id.clone());
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let outcome = loop {
            ticker.tick().await;
            match service.job_status(&job.id).await {
                Ok(report) => {
                    job.observe(&report);
                    if job.status.is_terminal() {
                        break terminal_outcome(&job);
                    }
                    debug!(
                        "Job {} still {:?}{}",
                        job.id,
                        job.status,
                        report.progress.map(|p| format!(": {}", p)).unwrap_or_default()
                    );
                }
                Err(e) => {
                    error!("Status query for job {} failed: {}", job.id, e);
                    break JobOutcome::PollingError { message: e.to_string() };
                }
            }
        };

        let event = PollEvent {
            job_id: job.id.clone(),
            outcome,
        };
        if events.send(event).await.is_err() {
            warn!("Session went away before job {} was reported", job.id);
        }
    });

    JobPollerHandle { job_id, handle }
}

/// Only meaningful once `job.status` is terminal.
fn terminal_outcome(job: &GenerationJob) -> JobOutcome {
    match (job.status, &job.artifact) {
        (JobStatus::Completed, Some(artifact)) => {
            info!("Job {} completed: {}", job.id, artifact);
            JobOutcome::Completed {
                artifact: artifact.clone(),
            }
        }
        (JobStatus::Completed, None) => {
            warn!("Job {} completed without a download reference", job.id);
            JobOutcome::Failed {
                message: Some("The presentation finished without a download link.".to_string()),
            }
        }
        _ => {
            info!("Job {} failed: {:?}", job.id, job.error_message);
            let message = job.error_message.clone().filter(|m| !m.trim().is_empty());
            JobOutcome::Failed { message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckflow_common::models::JobStatusReport;

    fn observed(reports: &[JobStatusReport]) -> GenerationJob {
        let mut job = GenerationJob::submitted(JobId::new("t"));
        for report in reports {
            job.observe(report);
        }
        job
    }

    #[test]
    fn running_reports_are_not_terminal() {
        let job = observed(&[JobStatusReport::pending(), JobStatusReport::processing("50%")]);
        assert!(!job.status.is_terminal());
    }

    #[test]
    fn completed_without_artifact_is_a_failure() {
        let job = observed(&[JobStatusReport {
            status: JobStatus::Completed,
            artifact: None,
            error_message: None,
            progress: None,
        }]);
        assert!(job.status.is_terminal());
        assert!(matches!(
            terminal_outcome(&job),
            JobOutcome::Failed { message: Some(_) }
        ));
    }

    #[test]
    fn blank_failure_text_is_dropped() {
        let job = observed(&[JobStatusReport::failed(Some("  ".into()))]);
        assert_eq!(terminal_outcome(&job), JobOutcome::Failed { message: None });
    }

    #[test]
    fn completion_after_progress_carries_the_artifact() {
        let job = observed(&[
            JobStatusReport::processing("Rendering"),
            JobStatusReport::completed(ArtifactRef::new("/static/deck.pptx")),
        ]);
        assert_eq!(
            terminal_outcome(&job),
            JobOutcome::Completed {
                artifact: ArtifactRef::new("/static/deck.pptx")
            }
        );
    }
}
