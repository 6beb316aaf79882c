//! Résumé build workspace: an optional uploaded résumé, the target job
//! description, and the call that turns the submitted profile into a
//! downloadable résumé.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::ResumeBuilder;
use crate::errors::{AppError, BackendError, ValidationError};
use crate::models::profile::SubmissionPayload;
use crate::models::resume::{ResumeBuildRequest, UploadedResume};

pub mod upload;

pub struct ResumeWorkspace {
    builder: Arc<dyn ResumeBuilder>,
    upload: Option<UploadedResume>,
    job_description: String,
    download_url: Option<String>,
}

impl ResumeWorkspace {
    pub fn new(builder: Arc<dyn ResumeBuilder>) -> Self {
        Self {
            builder,
            upload: None,
            job_description: String::new(),
            download_url: None,
        }
    }

    /// Replaces any previous upload. Rejected files leave the old one in place.
    pub fn attach_file(
        &mut self,
        file_name: &str,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<(), ValidationError> {
        let upload = upload::to_uploaded_resume(file_name, mime_type, bytes)?;
        info!("Attached {} ({} bytes)", upload.file_name, bytes.len());
        self.upload = Some(upload);
        Ok(())
    }

    pub fn uploaded_file_name(&self) -> Option<&str> {
        self.upload.as_ref().map(|u| u.file_name.as_str())
    }

    pub fn set_job_description(&mut self, text: &str) {
        self.job_description = text.to_string();
    }

    /// A build needs either an uploaded résumé or a job description.
    pub fn is_ready(&self) -> bool {
        self.upload.is_some() || !self.job_description.trim().is_empty()
    }

    /// URL of the last successful build.
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }

    pub async fn build(&mut self, profile: &SubmissionPayload) -> Result<String, AppError> {
        if !self.is_ready() {
            return Err(ValidationError::single(
                "job_description",
                "Upload a résumé or enter a job description",
            )
            .into());
        }

        // Upload-only builds target the profile's own summary.
        let job_description = if self.job_description.trim().is_empty() {
            profile.description()
        } else {
            self.job_description.as_str()
        };
        if job_description.trim().is_empty() {
            return Err(ValidationError::single(
                "job_description",
                "Enter a job description or complete the profile summary",
            )
            .into());
        }

        let request =
            ResumeBuildRequest::from_payload(profile, job_description, self.upload.clone());

        let result = match self.builder.build_resume(&request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Résumé build failed: {e}");
                return Err(e.into());
            }
        };

        let url = result
            .download_url()
            .ok_or(BackendError::MissingField("s3_urls.download_url"))?
            .to_string();
        info!("Résumé built for {}", profile.handle());
        self.download_url = Some(url.clone());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::InMemoryBackend;
    use crate::models::identity::Identity;

    fn profile_described(description: &str) -> SubmissionPayload {
        let identity = Identity {
            handle: "ada".to_string(),
            stable_id: "sub-1".to_string(),
            email: None,
        };
        SubmissionPayload::new(
            &identity,
            "Ada",
            description,
            &["Rust".to_string()],
            &[],
            &[],
        )
    }

    fn profile() -> SubmissionPayload {
        profile_described("")
    }

    #[test]
    fn test_readiness() {
        let mut workspace = ResumeWorkspace::new(Arc::new(InMemoryBackend::new()));
        assert!(!workspace.is_ready());

        workspace.set_job_description("   ");
        assert!(!workspace.is_ready());

        workspace
            .attach_file("cv.pdf", "application/pdf", b"%PDF")
            .unwrap();
        assert!(workspace.is_ready());
    }

    #[test]
    fn test_rejected_upload_keeps_previous() {
        let mut workspace = ResumeWorkspace::new(Arc::new(InMemoryBackend::new()));
        workspace
            .attach_file("cv.pdf", "application/pdf", b"%PDF")
            .unwrap();
        assert!(workspace.attach_file("cv.txt", "text/plain", b"hi").is_err());
        assert_eq!(workspace.uploaded_file_name(), Some("cv.pdf"));
    }

    #[tokio::test]
    async fn test_build_not_ready() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut workspace = ResumeWorkspace::new(backend.clone());
        let err = workspace.build(&profile()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.builds().is_empty());
    }

    #[tokio::test]
    async fn test_build_returns_download_url() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut workspace = ResumeWorkspace::new(backend.clone());
        workspace.set_job_description("Senior backend engineer");

        let url = workspace.build(&profile()).await.unwrap();

        assert_eq!(url, "https://files.example.com/resume.html");
        assert_eq!(workspace.download_url(), Some(url.as_str()));
        let sent = backend.builds();
        assert_eq!(sent[0].job_description, "Senior backend engineer");
        assert_eq!(sent[0].candidate_data.skills, vec!["Rust".to_string()]);
    }

    #[tokio::test]
    async fn test_upload_only_build_uses_profile_description() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut workspace = ResumeWorkspace::new(backend.clone());
        workspace
            .attach_file("cv.pdf", "application/pdf", b"%PDF")
            .unwrap();

        workspace
            .build(&profile_described("Backend role"))
            .await
            .unwrap();

        let sent = backend.builds();
        assert_eq!(sent[0].job_description, "Backend role");
        assert!(sent[0].uploaded_resume.is_some());
    }

    #[tokio::test]
    async fn test_upload_only_build_without_any_description_is_rejected() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut workspace = ResumeWorkspace::new(backend.clone());
        workspace
            .attach_file("cv.pdf", "application/pdf", b"%PDF")
            .unwrap();

        let err = workspace.build(&profile()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.builds().is_empty());
    }

    #[tokio::test]
    async fn test_build_failure_surfaces_backend_error() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail_builds(true);
        let mut workspace = ResumeWorkspace::new(backend);
        workspace.set_job_description("JD");

        let err = workspace.build(&profile()).await.unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
        assert!(workspace.download_url().is_none());
    }
}
