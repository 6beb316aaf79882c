//! Profile and résumé-build endpoints. Responses are surfaced to the UI as
//! they come; the client core does not interpret them.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::BackendError;
use crate::models::profile::{ProfileRecord, SubmissionPayload};
use crate::models::resume::{ResumeBuildRequest, ResumeBuildResult};

pub mod client;
#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait ProfileBackend: Send + Sync {
    async fn fetch_profile(&self, email: &str) -> Result<ProfileRecord, BackendError>;

    async fn save_profile(&self, payload: &SubmissionPayload) -> Result<Value, BackendError>;
}

#[async_trait]
pub trait ResumeBuilder: Send + Sync {
    async fn build_resume(
        &self,
        request: &ResumeBuildRequest,
    ) -> Result<ResumeBuildResult, BackendError>;
}
