use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::{ProfileBackend, ResumeBuilder};
use crate::errors::BackendError;
use crate::models::profile::{ProfileRecord, SubmissionPayload};
use crate::models::resume::{ResumeBuildRequest, ResumeBuildResult};

#[derive(Debug, Serialize)]
struct FetchProfileRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "message")]
    error: Value,
}

/// HTTP client for the profile API and the résumé-build endpoint.
/// No retries: failures go straight back to the caller.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    profile_url: String,
    build_url: String,
}

impl BackendClient {
    pub fn new(profile_url: &str, build_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self {
            client,
            profile_url: profile_url.trim_end_matches('/').to_string(),
            build_url: build_url.to_string(),
        })
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let response = self.client.post(url).json(body).send().await?;
        let response = check_status(response).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

async fn check_status(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .map(|b| match b.error {
            Value::String(s) => s,
            Value::Object(o) => match o.get("message").and_then(|m| m.as_str()) {
                Some(m) => m.to_string(),
                None => Value::Object(o.clone()).to_string(),
            },
            other => other.to_string(),
        })
        .unwrap_or(body);
    warn!("Backend returned {status}: {message}");

    Err(BackendError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ProfileBackend for BackendClient {
    async fn fetch_profile(&self, email: &str) -> Result<ProfileRecord, BackendError> {
        let url = format!("{}/fetchProfile", self.profile_url);
        self.post(&url, &FetchProfileRequest { email }).await
    }

    async fn save_profile(&self, payload: &SubmissionPayload) -> Result<Value, BackendError> {
        let url = format!("{}/saveProfile", self.profile_url);
        let response: Value = self.post(&url, payload).await?;
        debug!("saveProfile answered: {response}");
        Ok(response)
    }
}

#[async_trait]
impl ResumeBuilder for BackendClient {
    async fn build_resume(
        &self,
        request: &ResumeBuildRequest,
    ) -> Result<ResumeBuildResult, BackendError> {
        let result: ResumeBuildResult = self.post(&self.build_url, request).await?;
        if result.download_url().is_none() {
            return Err(BackendError::MissingField("s3_urls.download_url"));
        }
        Ok(result)
    }
}
