//! reqwest binding of the collaborator traits to the deck backend's JSON API.

use async_trait::async_trait;
use deckflow_common::models::{
    ArtifactRef, ExtractionConfig, ExtractionResult, ExtractionStatus, ImageLayout, JobId,
    JobStatus, JobStatusReport, ProductContent,
};
use deckflow_common::traits::{ExtractionService, GenerationService, LivenessProbe};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};
use url::Url;

use crate::config::DeckflowConfig;
use crate::Error;

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Deserialize)]
struct WireProduct {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    specifications: Vec<String>,
    #[serde(default)]
    content_integration: Vec<String>,
    #[serde(default)]
    infrastructure_requirements: Vec<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    image_layout: Option<ImageLayout>,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    products: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
    #[serde(default)]
    progress: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Client for the deck backend. Implements all three collaborator traits.
#[derive(Debug, Clone)]
pub struct DeckApiClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl DeckApiClient {
    pub fn new(config: &DeckflowConfig) -> Result<Self, Error> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self::with_client(client, config.api_url.clone(), config.api_token.clone()))
    }

    pub fn with_client(client: Client, base_url: Url, token: Option<String>) -> Self {
        Self {
            client,
            base_url,
            token,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        // Keep any path prefix on the base URL.
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        Ok(base.join(path.trim_start_matches('/'))?)
    }

    /// The job id is opaque: it always lands as a single encoded path segment.
    fn status_url(&self, job_id: &JobId) -> Result<Url, Error> {
        let id = job_id.as_str();
        if id.trim().is_empty() || id == "." || id == ".." {
            return Err(Error::Parse(format!("unusable job id '{}'", id)));
        }
        let mut url = self.endpoint("api/ppt/status/")?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API URL '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Reads the body of a successful response as `T`, or turns an error
    /// response into [`Error::Service`].
    async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, Error> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let message = error_detail(&text).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            });
            error!("Backend returned {}: {}", status, message);
            return Err(Error::Service {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// FastAPI puts its error text under `detail`, either as a string or as a
/// list of validation errors with `msg` fields.
fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match &value["detail"] {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items.iter().filter_map(|i| i["msg"].as_str()).collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        _ => None,
    }
}

#[async_trait]
impl LivenessProbe for DeckApiClient {
    async fn check(&self) -> Result<bool, Error> {
        let response = self
            .authorize(self.client.get(self.endpoint("health")?))
            .send()
            .await?;
        if !response.status().is_success() {
            debug!("Health check answered {}", response.status());
            return Err(Error::Unavailable(format!(
                "health check answered {}",
                response.status()
            )));
        }
        let health: HealthResponse = Self::read_json(response).await?;
        Ok(health.status.eq_ignore_ascii_case("healthy"))
    }
}

#[async_trait]
impl ExtractionService for DeckApiClient {
    async fn extract(
        &self,
        product_names: &[String],
        config: &ExtractionConfig,
    ) -> Result<ExtractionResult, Error> {
        let response = self
            .authorize(self.client.post(self.endpoint("api/extract-content")?))
            .json(&json!({
                "product_names": product_names,
                "summarization_requirements": config,
            }))
            .send()
            .await?;
        let body: ExtractResponse = Self::read_json(response).await?;

        let products = body
            .products
            .into_iter()
            .enumerate()
            .map(|(index, wire)| {
                let name = wire
                    .product_name
                    .or_else(|| product_names.get(index).cloned())
                    .unwrap_or_default();
                let layout = wire
                    .image_layout
                    .unwrap_or_else(|| ImageLayout::for_position(index));
                let mut content = ProductContent::new(name, layout);
                content.overview = wire.overview;
                content.specifications = wire.specifications;
                content.content_integration = wire.content_integration;
                content.infrastructure_requirements = wire.infrastructure_requirements;
                content.images = wire.images;
                content
            })
            .collect();
        Ok(ExtractionResult::new(products, ExtractionStatus::Success))
    }
}

#[async_trait]
impl GenerationService for DeckApiClient {
    async fn submit(&self, prompt: &str, products: &[ProductContent]) -> Result<JobId, Error> {
        let response = self
            .authorize(self.client.post(self.endpoint("api/ppt/generate")?))
            .json(&json!({
                "prompt": prompt,
                "products": products,
            }))
            .send()
            .await?;
        let body: GenerateResponse = Self::read_json(response).await?;
        if body.task_id.trim().is_empty() {
            return Err(Error::Parse("generation response carried an empty task_id".into()));
        }
        Ok(JobId::new(body.task_id))
    }

    async fn job_status(&self, job_id: &JobId) -> Result<JobStatusReport, Error> {
        let response = self
            .authorize(self.client.get(self.status_url(job_id)?))
            .send()
            .await?;
        let body: StatusResponse = Self::read_json(response).await?;
        Ok(JobStatusReport {
            status: JobStatus::from_wire(&body.status),
            artifact: body.download_url.filter(|u| !u.is_empty()).map(ArtifactRef::new),
            error_message: body.error_message,
            progress: body.progress,
        })
    }
}
