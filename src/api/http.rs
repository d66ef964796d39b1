use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{ApiError, EquipmentApi};
use crate::model::{EquipmentId, EquipmentRecord, Submission};

/// [`EquipmentApi`] over HTTP/JSON using `reqwest`.
///
/// Uses the client's default timeouts; no retries.
#[derive(Debug, Clone)]
pub struct HttpEquipmentApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpEquipmentApi {
    /// Creates a client for the server at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/equipment", self.base_url)
    }

    /// The id is pushed as a single percent-encoded path segment.
    fn item_url(&self, id: &EquipmentId) -> Result<reqwest::Url, ApiError> {
        let invalid = || ApiError::InvalidUrl(self.base_url.clone());
        let mut url = reqwest::Url::parse(&self.collection_url()).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .push(id.as_str());
        Ok(url)
    }

    /// Maps non-2xx responses to [`ApiError::Server`].
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.unwrap_or_default();
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R, ApiError> {
        let resp = Self::check(resp).await?;
        resp.json::<R>()
            .await
            .map_err(|e| ApiError::Decode(format!("response body: {e}")))
    }
}

#[async_trait]
impl EquipmentApi for HttpEquipmentApi {
    async fn list(&self) -> Result<Vec<EquipmentRecord>, ApiError> {
        debug!(url = %self.collection_url(), "GET");
        let resp = self.http.get(self.collection_url()).send().await?;
        Self::parse(resp).await
    }

    async fn create(&self, body: &Submission) -> Result<(), ApiError> {
        debug!(url = %self.collection_url(), "POST");
        let resp = self
            .http
            .post(self.collection_url())
            .json(body)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn update(&self, id: &EquipmentId, body: &Submission) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        debug!(%url, "PUT");
        let resp = self.http.put(url).json(body).send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    async fn delete(&self, id: &EquipmentId) -> Result<(), ApiError> {
        let url = self.item_url(id)?;
        debug!(%url, "DELETE");
        let resp = self.http.delete(url).send().await?;
        Self::check(resp).await?;
        Ok(())
    }
}
