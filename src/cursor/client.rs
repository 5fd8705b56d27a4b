use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::AgentError;
use super::types::{Conversation, LaunchRequest, LaunchResponse, StatusResponse};
use crate::config::ApiSettings;
use crate::state_machine::JobStatus;

/// The three calls the job lifecycle needs from the remote side.
pub trait AgentApi {
    /// Starts a job and returns its id.
    async fn launch(&self, req: &LaunchRequest) -> Result<String, AgentError>;

    /// Current status of a job; `None` if the response carried none.
    async fn status(&self, job_id: &str) -> Result<Option<JobStatus>, AgentError>;

    /// Full message history of a job.
    async fn conversation(&self, job_id: &str) -> Result<Conversation, AgentError>;
}

impl<T: AgentApi> AgentApi for &T {
    async fn launch(&self, req: &LaunchRequest) -> Result<String, AgentError> {
        (**self).launch(req).await
    }

    async fn status(&self, job_id: &str) -> Result<Option<JobStatus>, AgentError> {
        (**self).status(job_id).await
    }

    async fn conversation(&self, job_id: &str) -> Result<Conversation, AgentError> {
        (**self).conversation(job_id).await
    }
}

/// HTTP client for the Cursor background-agent API.
pub struct CursorClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl CursorClient {
    /// Builds a client from explicit settings. Fails with
    /// [`AgentError::MissingCredential`] when no API key is set.
    pub fn new(settings: &ApiSettings) -> Result<Self, AgentError> {
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            return Err(AgentError::MissingCredential);
        }
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(settings.request_timeout)
            .danger_accept_invalid_certs(settings.skip_tls_verify)
            .build()?;
        Ok(Self {
            api_key: api_key.to_string(),
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, AgentError> {
        let response = request
            .basic_auth(&self.api_key, None::<&str>)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AgentError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| AgentError::InvalidResponse(e.to_string()))
    }
}

impl AgentApi for CursorClient {
    async fn launch(&self, req: &LaunchRequest) -> Result<String, AgentError> {
        if req.source.repository.trim().is_empty() {
            return Err(AgentError::InvalidRequest(
                "no target repository configured (set CURSOR_REPOSITORY)".into(),
            ));
        }
        let resp: LaunchResponse = self
            .send(self.client.post(self.url("/agents")).json(req))
            .await?;
        let id = resp
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AgentError::InvalidResponse("launch response missing 'id'".into()))?;
        debug!("Launched agent job {id}");
        Ok(id)
    }

    async fn status(&self, job_id: &str) -> Result<Option<JobStatus>, AgentError> {
        let resp: StatusResponse = self
            .send(self.client.get(self.url(&format!("/agents/{job_id}"))))
            .await?;
        Ok(resp.status)
    }

    async fn conversation(&self, job_id: &str) -> Result<Conversation, AgentError> {
        self.send(
            self.client
                .get(self.url(&format!("/agents/{job_id}/conversation"))),
        )
        .await
    }
}
