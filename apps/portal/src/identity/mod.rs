//! Identity provider contract. The hosted user pool is the production
//! implementation; tests swap in an in-memory provider.

use async_trait::async_trait;

use crate::errors::AuthError;
use crate::models::identity::Identity;

pub mod hosted;
#[cfg(test)]
pub mod memory;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpStep {
    /// A confirmation code was sent; `destination` is the masked address, if known.
    ConfirmWithCode { destination: Option<String> },
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user_sub: Option<String>,
    pub next_step: SignUpStep,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError>;

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError>;

    /// Fails with `AuthError::SessionExists` when a session is already held.
    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Fails with `AuthError::NoSession` when nobody is signed in.
    async fn current_identity(&self) -> Result<Identity, AuthError>;
}
