// File: deckflow-core/src/extraction/client.rs

use std::sync::Arc;
use std::time::Duration;

use deckflow_common::models::{ExtractionConfig, ExtractionResult};
use deckflow_common::traits::{ExtractionService, LivenessProbe};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_PROBE_TIMEOUT;
use crate::extraction::fallback::simulate_products;
use crate::Error;

/// Fetches product content from the extraction service, substituting
/// simulated content when the service cannot be reached.
pub struct ContentExtractionClient {
    service: Arc<dyn ExtractionService>,
    probe: Arc<dyn LivenessProbe>,
    config: ExtractionConfig,
    probe_timeout: Duration,
}

impl ContentExtractionClient {
    pub fn new(service: Arc<dyn ExtractionService>, probe: Arc<dyn LivenessProbe>) -> Self {
        Self {
            service,
            probe,
            config: ExtractionConfig::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_probe_timeout(mut self, probe_timeout: Duration) -> Self {
        self.probe_timeout = probe_timeout;
        self
    }

    /// Content for every name, in order. Only a service that answered with
    /// an error (or with the wrong number of products) makes this fail.
    pub async fn extract(&self, product_names: &[String]) -> Result<ExtractionResult, Error> {
        if !self.service_available().await {
            info!(
                "Extraction service unavailable; simulating content for {} product(s)",
                product_names.len()
            );
            return Ok(simulate_products(product_names));
        }

        match self.service.extract(product_names, &self.config).await {
            Ok(result) if result.count() != product_names.len() => {
                warn!(
                    "Extraction service returned {} product(s) for {} requested",
                    result.count(),
                    product_names.len()
                );
                Err(Error::Service {
                    status: 502,
                    message: format!(
                        "expected content for {} product(s), received {}",
                        product_names.len(),
                        result.count()
                    ),
                })
            }
            Ok(result) => {
                debug!("Extracted content for {} product(s)", result.count());
                Ok(result)
            }
            Err(e) if e.is_transport() => {
                warn!("Extraction request failed before reaching the service: {}", e);
                Ok(simulate_products(product_names))
            }
            Err(e) => {
                warn!("Extraction service error: {}", e);
                Err(e)
            }
        }
    }

    async fn service_available(&self) -> bool {
        match timeout(self.probe_timeout, self.probe.check()).await {
            Ok(Ok(available)) => available,
            Ok(Err(e)) => {
                debug!("Liveness probe failed: {}", e);
                false
            }
            Err(_) => {
                debug!("Liveness probe timed out after {:?}", self.probe_timeout);
                false
            }
        }
    }
}
