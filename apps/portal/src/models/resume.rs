use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::profile::{EducationEntry, ExperienceEntry, SubmissionPayload};

/// Location placeholder the build endpoint expects for every row.
const UNKNOWN_LOCATION: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeExperience {
    pub job_title: String,
    pub company: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub location: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeEducation {
    pub degree: String,
    pub institution: String,
    pub start_year: String,
    pub end_year: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateData {
    pub name: String,
    pub skills: Vec<String>,
    pub experience: Vec<ResumeExperience>,
    pub education: Vec<ResumeEducation>,
}

/// An uploaded résumé document carried as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedResume {
    pub file_name: String,
    pub mime_type: String,
    pub data_url: String,
}

/// Body posted to the résumé-build endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeBuildRequest {
    pub candidate_data: CandidateData,
    pub job_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_resume: Option<UploadedResume>,
}

impl ResumeBuildRequest {
    pub fn from_payload(
        payload: &SubmissionPayload,
        job_description: &str,
        uploaded_resume: Option<UploadedResume>,
    ) -> Self {
        Self {
            candidate_data: CandidateData {
                name: payload.full_name().to_string(),
                skills: payload.skills().to_vec(),
                experience: payload.experiences().iter().map(to_resume_experience).collect(),
                education: payload.education().iter().map(to_resume_education).collect(),
            },
            job_description: job_description.trim().to_string(),
            uploaded_resume,
        }
    }
}

fn to_resume_experience(entry: &ExperienceEntry) -> ResumeExperience {
    let responsibilities = entry
        .responsibilities
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect();

    ResumeExperience {
        job_title: entry.job_title.clone(),
        company: entry.company.clone(),
        start_date: entry.start_date,
        end_date: entry.end_date,
        location: UNKNOWN_LOCATION.to_string(),
        responsibilities,
    }
}

fn to_resume_education(entry: &EducationEntry) -> ResumeEducation {
    ResumeEducation {
        degree: entry.degree.clone(),
        institution: entry.institution.clone(),
        start_year: year_of(entry.start_date),
        end_year: year_of(entry.end_date),
        location: UNKNOWN_LOCATION.to_string(),
    }
}

fn year_of(date: Option<NaiveDate>) -> String {
    date.map(|d| d.year().to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct S3Urls {
    pub download_url: String,
}

/// Result of a build call. Older deployments answer with a flat `s3_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResumeBuildResult {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub s3_urls: Option<S3Urls>,
    #[serde(default)]
    pub s3_url: Option<String>,
}

impl ResumeBuildResult {
    pub fn download_url(&self) -> Option<&str> {
        self.s3_urls
            .as_ref()
            .map(|u| u.download_url.as_str())
            .or(self.s3_url.as_deref())
            .filter(|u| !u.is_empty())
    }
}
