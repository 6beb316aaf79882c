//! Per-section validation. Each function checks only its own section and
//! reports every offending field at once.

use chrono::NaiveDate;

use crate::errors::{FieldError, ValidationError};
use crate::form::draft::ProfileDraft;
use crate::models::profile::{EducationEntry, EntryKind, ExperienceEntry};

/// Number of wizard sections before `Submitted`.
pub const SECTION_COUNT: usize = 2;

pub fn validate_section(index: usize, draft: &ProfileDraft) -> Result<(), ValidationError> {
    match index {
        0 => validate_profile_section(draft),
        1 => validate_details_section(draft),
        _ => Ok(()),
    }
}

/// Section 0: name, email and every non-removed experience / education row.
pub fn validate_profile_section(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if draft.full_name.trim().is_empty() {
        errors.push(FieldError::new("full_name", "Full name is required"));
    }

    let email = draft.email.trim();
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Email is not a valid address"));
    }

    for (index, entry) in draft.experiences.iter().enumerate() {
        if !entry.removed {
            check_experience(index, entry, &mut errors);
        }
    }
    for (index, entry) in draft.education.iter().enumerate() {
        if !entry.removed {
            check_education(index, entry, &mut errors);
        }
    }

    ValidationError::from_fields(errors)
}

/// Section 1: the free-text description the résumé is tailored to.
pub fn validate_details_section(draft: &ProfileDraft) -> Result<(), ValidationError> {
    let mut errors = Vec::new();
    if draft.description.trim().is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    }
    ValidationError::from_fields(errors)
}

fn check_experience(index: usize, entry: &ExperienceEntry, errors: &mut Vec<FieldError>) {
    let prefix = format!("{}[{index}]", EntryKind::Experience.collection());
    require(&prefix, "job_title", &entry.job_title, errors);
    require(&prefix, "company", &entry.company, errors);
    check_range(&prefix, entry.start_date, entry.end_date, errors);
}

fn check_education(index: usize, entry: &EducationEntry, errors: &mut Vec<FieldError>) {
    let prefix = format!("{}[{index}]", EntryKind::Education.collection());
    require(&prefix, "degree", &entry.degree, errors);
    require(&prefix, "institution", &entry.institution, errors);
    check_range(&prefix, entry.start_date, entry.end_date, errors);
}

fn require(prefix: &str, field: &str, value: &str, errors: &mut Vec<FieldError>) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(
            format!("{prefix}.{field}"),
            format!("{} is required", field.replace('_', " ")),
        ));
    }
}

fn check_range(
    prefix: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    errors: &mut Vec<FieldError>,
) {
    match (start, end) {
        (None, _) => errors.push(FieldError::new(
            format!("{prefix}.start_date"),
            "start date is required",
        )),
        (Some(start), Some(end)) if end < start => errors.push(FieldError::new(
            format!("{prefix}.end_date"),
            "end date is before start date",
        )),
        _ => {}
    }
}

/// Loose address check: one `@`, non-empty local part, dotted domain without
/// empty labels, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty())
}
