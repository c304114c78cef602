// File: deckflow-common/src/models/generation.rs

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle the generation service returns for a submitted deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a finished deck can be fetched. Never interpreted, only handed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(String);

impl ArtifactRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Maps the service's status string. Anything unrecognised ("started",
    /// "retry", ...) is still running as far as we are concerned.
    pub fn from_wire(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "pending" => JobStatus::Pending,
            "completed" | "success" => JobStatus::Completed,
            "failed" | "failure" => JobStatus::Failed,
            _ => JobStatus::Processing,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// One answer from the job status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: JobStatus,
    pub artifact: Option<ArtifactRef>,
    pub error_message: Option<String>,
    pub progress: Option<String>,
}

impl JobStatusReport {
    pub fn pending() -> Self {
        Self::with_status(JobStatus::Pending)
    }

    pub fn processing(progress: impl Into<String>) -> Self {
        Self {
            progress: Some(progress.into()),
            ..Self::with_status(JobStatus::Processing)
        }
    }

    pub fn completed(artifact: ArtifactRef) -> Self {
        Self {
            artifact: Some(artifact),
            ..Self::with_status(JobStatus::Completed)
        }
    }

    pub fn failed(error_message: Option<String>) -> Self {
        Self {
            error_message,
            ..Self::with_status(JobStatus::Failed)
        }
    }

    fn with_status(status: JobStatus) -> Self {
        Self {
            status,
            artifact: None,
            error_message: None,
            progress: None,
        }
    }
}

/// Locally observed view of a job: what the latest poll said about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    pub id: JobId,
    pub status: JobStatus,
    pub artifact: Option<ArtifactRef>,
    pub error_message: Option<String>,
}

impl GenerationJob {
    pub fn submitted(id: JobId) -> Self {
        Self {
            id,
            status: JobStatus::Pending,
            artifact: None,
            error_message: None,
        }
    }

    pub fn observe(&mut self, report: &JobStatusReport) {
        self.status = report.status;
        self.artifact = match report.status {
            JobStatus::Completed => report.artifact.clone(),
            _ => None,
        };
        self.error_message = match report.status {
            JobStatus::Failed => report.error_message.clone(),
            _ => None,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_wire_statuses_are_not_terminal() {
        assert_eq!(JobStatus::from_wire("PROGRESS"), JobStatus::Processing);
        assert_eq!(JobStatus::from_wire("retry"), JobStatus::Processing);
        assert!(!JobStatus::from_wire("started").is_terminal());
        assert!(JobStatus::from_wire("Completed").is_terminal());
        assert!(JobStatus::from_wire("failed").is_terminal());
    }

    #[test]
    fn observe_keeps_artifact_only_when_completed() {
        let mut job = GenerationJob::submitted(JobId::new("task-1"));
        job.observe(&JobStatusReport::processing("Rendering slides"));
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.artifact.is_none());

        job.observe(&JobStatusReport::completed(ArtifactRef::new("/static/deck.pptx")));
        assert_eq!(job.artifact.as_ref().map(|a| a.as_str()), Some("/static/deck.pptx"));
        assert!(job.error_message.is_none());
    }
}
