use serde::{Deserialize, Serialize};

/// The authenticated user held client-side after sign-in or session restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub handle: String,
    pub stable_id: String,
    pub email: Option<String>,
}

impl Identity {
    /// Name shown in the shell: handle, then email, then a generic fallback.
    pub fn display_name(&self) -> &str {
        if !self.handle.is_empty() {
            &self.handle
        } else {
            self.email
                .as_deref()
                .filter(|e| !e.is_empty())
                .unwrap_or("User")
        }
    }
}
