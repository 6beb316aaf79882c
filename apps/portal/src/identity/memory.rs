//! In-memory identity provider for tests.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::identity::{IdentityProvider, SignUpOutcome, SignUpStep};
use crate::models::identity::Identity;

struct Account {
    password: String,
    handle: String,
    stable_id: String,
    confirmed: bool,
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: Mutex<HashMap<String, Account>>,
    session: Mutex<Option<Identity>>,
    sign_in_delays: Mutex<VecDeque<Duration>>,
    sign_out_delays: Mutex<VecDeque<Duration>>,
    check_delay: Mutex<Option<Duration>>,
    fail_sign_out: Mutex<bool>,
    fail_checks: Mutex<bool>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a confirmed account and returns its identity.
    pub fn with_account(self, email: &str, password: &str, handle: &str) -> Self {
        self.accounts.lock().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                handle: handle.to_string(),
                stable_id: Uuid::new_v4().to_string(),
                confirmed: true,
            },
        );
        self
    }

    /// Starts with `email` already signed in.
    pub fn signed_in_as(self, email: &str) -> Self {
        let identity = self.identity_for(email);
        *self.session.lock() = identity;
        self
    }

    pub fn identity_for(&self, email: &str) -> Option<Identity> {
        self.accounts.lock().get(email).map(|a| Identity {
            handle: a.handle.clone(),
            stable_id: a.stable_id.clone(),
            email: Some(email.to_string()),
        })
    }

    pub fn delay_next_sign_in(&self, delay: Duration) {
        self.sign_in_delays.lock().push_back(delay);
    }

    pub fn delay_next_sign_out(&self, delay: Duration) {
        self.sign_out_delays.lock().push_back(delay);
    }

    pub fn set_check_delay(&self, delay: Duration) {
        *self.check_delay.lock() = Some(delay);
    }

    pub fn fail_sign_out(&self, fail: bool) {
        *self.fail_sign_out.lock() = fail;
    }

    pub fn fail_checks(&self, fail: bool) {
        *self.fail_checks.lock() = fail;
    }

    /// Replaces the provider-side session, e.g. to simulate another tab.
    pub fn replace_session(&self, identity: Option<Identity>) {
        *self.session.lock() = identity;
    }

    pub fn has_session(&self) -> bool {
        self.session.lock().is_some()
    }
}

async fn pause(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(email) {
            return Err(AuthError::Provider {
                code: "UsernameExistsException".to_string(),
                message: "An account with the given email already exists.".to_string(),
            });
        }
        let stable_id = Uuid::new_v4().to_string();
        accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                handle: display_name.to_string(),
                stable_id: stable_id.clone(),
                confirmed: false,
            },
        );
        Ok(SignUpOutcome {
            user_sub: Some(stable_id),
            next_step: SignUpStep::ConfirmWithCode { destination: None },
        })
    }

    async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError> {
        let mut accounts = self.accounts.lock();
        let account = accounts
            .get_mut(email)
            .ok_or_else(|| AuthError::InvalidCredentials("Unknown user".to_string()))?;
        if code != "123456" {
            return Err(AuthError::Provider {
                code: "CodeMismatchException".to_string(),
                message: "Invalid verification code provided.".to_string(),
            });
        }
        account.confirmed = true;
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        if self.session.lock().is_some() {
            return Err(AuthError::SessionExists);
        }
        let delay = self.sign_in_delays.lock().pop_front();
        pause(delay).await;

        let identity = {
            let accounts = self.accounts.lock();
            let account = accounts
                .get(email)
                .filter(|a| a.password == password)
                .ok_or_else(|| {
                    AuthError::InvalidCredentials("Incorrect username or password.".to_string())
                })?;
            if !account.confirmed {
                return Err(AuthError::NotConfirmed("User is not confirmed.".to_string()));
            }
            Identity {
                handle: account.handle.clone(),
                stable_id: account.stable_id.clone(),
                email: Some(email.to_string()),
            }
        };
        *self.session.lock() = Some(identity);
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let delay = self.sign_out_delays.lock().pop_front();
        pause(delay).await;
        self.session.lock().take();
        if *self.fail_sign_out.lock() {
            return Err(AuthError::Network("sign-out request failed".to_string()));
        }
        Ok(())
    }

    /// Answers with the session as it was when the request was sent.
    async fn current_identity(&self) -> Result<Identity, AuthError> {
        let session = self.session.lock().clone();
        let delay = *self.check_delay.lock();
        pause(delay).await;
        if *self.fail_checks.lock() {
            return Err(AuthError::Network("identity check failed".to_string()));
        }
        session.ok_or(AuthError::NoSession)
    }
}
