use async_trait::async_trait;
use crate::error::Error;
use crate::models::{ExtractionConfig, ExtractionResult, JobId, JobStatusReport, ProductContent};

/// Cheap "is the extraction backend up?" check. Callers bound it with a timeout.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn check(&self) -> Result<bool, Error>;
}

/// Turns product names into structured content. Failures propagate as errors,
/// never as partial results.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(
        &self,
        product_names: &[String],
        config: &ExtractionConfig,
    ) -> Result<ExtractionResult, Error>;
}

/// The asynchronous deck renderer: submit once, then query by job id.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn submit(&self, prompt: &str, products: &[ProductContent]) -> Result<JobId, Error>;
    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusReport, Error>;
}
