//! Multi-step profile wizard.
//!
//! `Section(0)` → `Section(1)` → `Submitted`. Moving forward validates the
//! current section only. Rows are soft-removed in place so indexes stay
//! stable while editing; removed rows are left out of the payload and only
//! disappear from the bound collections on the next `load`.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::ProfileBackend;
use crate::errors::{AppError, AuthError};
use crate::form::draft::ProfileDraft;
use crate::form::validation::{validate_section, SECTION_COUNT};
use crate::models::profile::{EducationEntry, EntryKind, ExperienceEntry, SubmissionPayload};
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Section(usize),
    Submitted,
}

pub struct FormController {
    store: SessionStore,
    backend: Arc<dyn ProfileBackend>,
    state: FormState,
    draft: ProfileDraft,
    last_submitted: Option<SubmissionPayload>,
}

impl FormController {
    pub fn new(store: SessionStore, backend: Arc<dyn ProfileBackend>) -> Self {
        let email = store
            .current()
            .and_then(|i| i.email)
            .unwrap_or_default();

        Self {
            store,
            backend,
            state: FormState::Section(0),
            draft: ProfileDraft {
                email,
                ..Default::default()
            },
            last_submitted: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    /// Free-text fields are edited directly on the draft.
    pub fn draft_mut(&mut self) -> &mut ProfileDraft {
        &mut self.draft
    }

    pub fn last_submitted(&self) -> Option<&SubmissionPayload> {
        self.last_submitted.as_ref()
    }

    // ── Sections ───────────────────────────────────────────────────────────

    pub fn next(&mut self) -> Result<FormState, AppError> {
        let index = self.current_section()?;
        if index + 1 >= SECTION_COUNT {
            return Err(AppError::InvalidTransition(
                "Already on the final section; submit instead".to_string(),
            ));
        }
        validate_section(index, &self.draft)?;
        self.state = FormState::Section(index + 1);
        debug!("Form advanced to section {}", index + 1);
        Ok(self.state)
    }

    pub fn back(&mut self) -> Result<FormState, AppError> {
        match self.current_section()? {
            0 => Err(AppError::InvalidTransition(
                "Already on the first section".to_string(),
            )),
            index => {
                self.state = FormState::Section(index - 1);
                Ok(self.state)
            }
        }
    }

    fn current_section(&self) -> Result<usize, AppError> {
        match self.state {
            FormState::Section(index) => Ok(index),
            FormState::Submitted => Err(AppError::InvalidTransition(
                "Profile has already been submitted".to_string(),
            )),
        }
    }

    // ── Entries ────────────────────────────────────────────────────────────

    /// Appends a blank row and returns its index.
    pub fn add_entry(&mut self, kind: EntryKind) -> usize {
        match kind {
            EntryKind::Experience => {
                self.draft.experiences.push(ExperienceEntry::default());
                self.draft.experiences.len() - 1
            }
            EntryKind::Education => {
                self.draft.education.push(EducationEntry::default());
                self.draft.education.len() - 1
            }
        }
    }

    pub fn experience_mut(&mut self, index: usize) -> Option<&mut ExperienceEntry> {
        self.draft.experiences.get_mut(index)
    }

    pub fn education_mut(&mut self, index: usize) -> Option<&mut EducationEntry> {
        self.draft.education.get_mut(index)
    }

    /// Marks the row removed without shifting any index.
    pub fn soft_remove_entry(&mut self, kind: EntryKind, index: usize) -> Result<(), AppError> {
        self.set_removed(kind, index, true)
    }

    pub fn restore_entry(&mut self, kind: EntryKind, index: usize) -> Result<(), AppError> {
        self.set_removed(kind, index, false)
    }

    fn set_removed(&mut self, kind: EntryKind, index: usize, removed: bool) -> Result<(), AppError> {
        let flag = match kind {
            EntryKind::Experience => self.draft.experiences.get_mut(index).map(|e| &mut e.removed),
            EntryKind::Education => self.draft.education.get_mut(index).map(|e| &mut e.removed),
        };
        let flag = flag.ok_or_else(|| {
            AppError::NotFound(format!("{}[{index}] does not exist", kind.collection()))
        })?;
        *flag = removed;
        Ok(())
    }

    // ── Tags ───────────────────────────────────────────────────────────────

    /// Adds the trimmed tag if new. The input buffer is cleared either way.
    pub fn add_tag(&mut self, raw: &str) -> bool {
        let added = self.draft.tags.add(raw);
        self.draft.tag_input.clear();
        added
    }

    /// Commits whatever is in the tag input buffer.
    pub fn commit_tag_input(&mut self) -> bool {
        let raw = std::mem::take(&mut self.draft.tag_input);
        self.add_tag(&raw)
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        self.draft.tags.remove(index)
    }

    // ── Backend ────────────────────────────────────────────────────────────

    /// Replaces the draft with the stored profile and restarts the wizard.
    pub async fn load(&mut self, email: &str) -> Result<(), AppError> {
        let record = self.backend.fetch_profile(email).await?;
        self.draft = ProfileDraft::from_record(record, email);
        self.state = FormState::Section(0);
        info!("Loaded profile for {email}");
        Ok(())
    }

    /// Validates the final section, builds the payload and sends it once.
    /// On failure nothing changes and the error is returned for display.
    pub async fn submit(&mut self) -> Result<Value, AppError> {
        let index = self.current_section()?;
        if index + 1 != SECTION_COUNT {
            return Err(AppError::InvalidTransition(
                "Complete every section before submitting".to_string(),
            ));
        }
        validate_section(index, &self.draft)?;

        let identity = self.store.current().ok_or(AuthError::NoSession)?;
        let payload = SubmissionPayload::new(
            &identity,
            &self.draft.full_name,
            &self.draft.description,
            self.draft.tags.as_slice(),
            &self.draft.experiences,
            &self.draft.education,
        );
        debug!(
            "Submitting profile for {}: {} experiences, {} education, {} skills",
            payload.handle(),
            payload.experiences().len(),
            payload.education().len(),
            payload.skills().len()
        );

        match self.backend.save_profile(&payload).await {
            Ok(response) => {
                info!("Profile submitted for {}", payload.handle());
                self.state = FormState::Submitted;
                self.last_submitted = Some(payload);
                Ok(response)
            }
            Err(e) => {
                warn!("Profile submission failed: {e}");
                Err(e.into())
            }
        }
    }
}
