use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::identity::Identity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Experience,
    Education,
}

impl EntryKind {
    /// Field-path prefix used in validation errors.
    pub fn collection(&self) -> &'static str {
        match self {
            EntryKind::Experience => "experiences",
            EntryKind::Education => "education",
        }
    }
}

/// One row of the experience section.
///
/// `removed` is the soft-delete flag: it never travels over the wire and the
/// row is only dropped when a payload is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub responsibilities: String,
    #[serde(skip)]
    pub removed: bool,
}

/// One row of the education section. Same soft-delete rules as experience.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(skip)]
    pub removed: bool,
}

/// Stored profile as returned by `fetchProfile`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    pub full_name: String,
    pub email: Option<String>,
    pub description: String,
    pub skills: Vec<String>,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
}

/// Body of `saveProfile`. Built once per submit and never mutated afterwards,
/// so the fields are private and only readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    handle: String,
    description: String,
    full_name: String,
    skills: Vec<String>,
    experiences: Vec<ExperienceEntry>,
    education: Vec<EducationEntry>,
}

impl SubmissionPayload {
    /// Snapshots the given rows, dropping every soft-removed one.
    pub fn new(
        identity: &Identity,
        full_name: &str,
        description: &str,
        skills: &[String],
        experiences: &[ExperienceEntry],
        education: &[EducationEntry],
    ) -> Self {
        Self {
            handle: identity.handle.clone(),
            description: description.trim().to_string(),
            full_name: full_name.trim().to_string(),
            skills: skills.to_vec(),
            experiences: experiences.iter().filter(|e| !e.removed).cloned().collect(),
            education: education.iter().filter(|e| !e.removed).cloned().collect(),
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn experiences(&self) -> &[ExperienceEntry] {
        &self.experiences
    }

    pub fn education(&self) -> &[EducationEntry] {
        &self.education
    }
}
