//! REST implementation of [`HealthApi`] using [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::api::{ApiError, ApiResult, HealthApi};
use crate::domain::client::{Client, NewClient};
use crate::domain::program::{NewProgram, Program};
use crate::domain::types::{ClientId, ProgramId};

/// HTTP client bound to a single health API host.
#[derive(Clone, Debug)]
pub struct HttpHealthApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpHealthApi {
    /// Create a client for `base_url`, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> ApiResult<Self> {
        let raw = base_url.into();
        let base_url = Url::parse(&raw).map_err(|err| ApiError::InvalidBaseUrl {
            url: raw.clone(),
            reason: err.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: raw,
                reason: "not a hierarchical URL".to_string(),
            });
        }
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Appends `segments` to the base path, percent-encoding each one so an
    /// id can never escape its path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ---- private helpers ----

    /// Returns the response unchanged on success, or an [`ApiError::Status`]
    /// with the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Checks the status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> ApiResult<()> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl HealthApi for HttpHealthApi {
    async fn create_program(&self, program: &NewProgram) -> ApiResult<Program> {
        let response = self
            .client
            .post(self.url(&["programs", ""]))
            .json(program)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_programs(&self) -> ApiResult<Vec<Program>> {
        let response = self.client.get(self.url(&["programs", ""])).send().await?;

        Self::parse_response(response).await
    }

    async fn delete_program(&self, program_id: &ProgramId) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.url(&["programs", program_id.as_str()]))
            .send()
            .await?;

        Self::check_status(response).await
    }

    async fn create_client(&self, client: &NewClient) -> ApiResult<Client> {
        let response = self
            .client
            .post(self.url(&["clients", ""]))
            .json(client)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn get_clients(&self) -> ApiResult<Vec<Client>> {
        let response = self.client.get(self.url(&["clients", ""])).send().await?;

        Self::parse_response(response).await
    }

    async fn get_client(&self, client_id: &ClientId) -> ApiResult<Client> {
        let response = self
            .client
            .get(self.url(&["clients", client_id.as_str()]))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    async fn enroll_client(
        &self,
        client_id: &ClientId,
        program_ids: &[ProgramId],
    ) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url(&["clients", client_id.as_str(), "enroll"]))
            .json(program_ids)
            .send()
            .await?;

        Self::check_status(response).await
    }

    async fn unenroll_programs(
        &self,
        client_id: &ClientId,
        program_ids: &[ProgramId],
    ) -> ApiResult<()> {
        let response = self
            .client
            .post(self.url(&["clients", client_id.as_str(), "unenroll"]))
            .json(program_ids)
            .send()
            .await?;

        Self::check_status(response).await
    }
}
