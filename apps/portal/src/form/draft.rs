use crate::form::tags::TagCollection;
use crate::models::profile::{EducationEntry, ExperienceEntry, ProfileRecord};

/// Everything the wizard binds to, including soft-removed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileDraft {
    pub full_name: String,
    pub email: String,
    pub description: String,
    pub experiences: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub tags: TagCollection,
    pub tag_input: String,
}

impl ProfileDraft {
    /// Fresh draft from a stored profile. Falls back to `email` when the
    /// record does not carry one.
    pub fn from_record(record: ProfileRecord, email: &str) -> Self {
        Self {
            full_name: record.full_name,
            email: record.email.unwrap_or_else(|| email.to_string()),
            description: record.description,
            experiences: record.experiences,
            education: record.education,
            tags: record.skills.iter().collect(),
            tag_input: String::new(),
        }
    }
}
