//! Model catalog collaborator

use async_trait::async_trait;
use shared::ModelSearchResponse;

use super::{ServiceError, REQUEST_TIMEOUT};

/// Searches an external catalog of downloadable 3D models
#[async_trait]
pub trait ModelCatalog {
    async fn search_models(&self, term: &str) -> Result<ModelSearchResponse, ServiceError>;
}

/// HTTP model catalog client
pub struct HttpModelCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpModelCatalog {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ModelCatalog for HttpModelCatalog {
    async fn search_models(&self, term: &str) -> Result<ModelSearchResponse, ServiceError> {
        tracing::debug!(term, "searching model catalog");
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .query(&[("query", term), ("limit", "10")])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .json::<ModelSearchResponse>()
            .await?;
        // an `error` field with zero hits is the catalog's "nothing found"
        // reply, which the interpreter reports as a status, not a failure
        Ok(response)
    }
}
