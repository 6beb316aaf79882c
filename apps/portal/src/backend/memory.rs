//! In-memory backend for tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::backend::{ProfileBackend, ResumeBuilder};
use crate::errors::BackendError;
use crate::models::profile::{ProfileRecord, SubmissionPayload};
use crate::models::resume::{ResumeBuildRequest, ResumeBuildResult, S3Urls};

#[derive(Default)]
pub struct InMemoryBackend {
    stored: Mutex<Option<ProfileRecord>>,
    saved: Mutex<Vec<SubmissionPayload>>,
    builds: Mutex<Vec<ResumeBuildRequest>>,
    fail_saves: Mutex<bool>,
    fail_builds: Mutex<bool>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(self, record: ProfileRecord) -> Self {
        *self.stored.lock() = Some(record);
        self
    }

    pub fn fail_saves(&self, fail: bool) {
        *self.fail_saves.lock() = fail;
    }

    pub fn fail_builds(&self, fail: bool) {
        *self.fail_builds.lock() = fail;
    }

    pub fn saved(&self) -> Vec<SubmissionPayload> {
        self.saved.lock().clone()
    }

    pub fn builds(&self) -> Vec<ResumeBuildRequest> {
        self.builds.lock().clone()
    }
}

fn unavailable() -> BackendError {
    BackendError::Status {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

#[async_trait]
impl ProfileBackend for InMemoryBackend {
    async fn fetch_profile(&self, _email: &str) -> Result<ProfileRecord, BackendError> {
        self.stored.lock().clone().ok_or(BackendError::Status {
            status: 404,
            message: "profile not found".to_string(),
        })
    }

    async fn save_profile(&self, payload: &SubmissionPayload) -> Result<Value, BackendError> {
        if *self.fail_saves.lock() {
            return Err(unavailable());
        }
        self.saved.lock().push(payload.clone());
        Ok(json!({"message": "Profile saved"}))
    }
}

#[async_trait]
impl ResumeBuilder for InMemoryBackend {
    async fn build_resume(
        &self,
        request: &ResumeBuildRequest,
    ) -> Result<ResumeBuildResult, BackendError> {
        if *self.fail_builds.lock() {
            return Err(unavailable());
        }
        self.builds.lock().push(request.clone());
        Ok(ResumeBuildResult {
            message: Some("Resume generated successfully".to_string()),
            s3_urls: Some(S3Urls {
                download_url: "https://files.example.com/resume.html".to_string(),
            }),
            s3_url: None,
        })
    }
}
