//! Top-level shell: projects the session onto sign-in/out controls and sends
//! the user to the login view when the session disappears under a protected
//! view. Holds nothing that the session store and router don't already know.

use tracing::info;

use crate::errors::AppError;
use crate::identity::SignUpOutcome;
use crate::routing::{Navigation, Route, Router};
use crate::session::{SessionStore, Subscription};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub logged_in: bool,
    pub display_name: Option<String>,
    pub location: Option<Route>,
}

pub struct Shell {
    store: SessionStore,
    router: Router,
    _subscription: Subscription,
}

impl Shell {
    pub fn attach(store: SessionStore, router: Router) -> Self {
        let watcher = router.clone();
        let subscription = store.subscribe(move |identity| {
            if identity.is_none() && watcher.location().is_some_and(|r| r.is_protected()) {
                info!("Session ended on a protected view");
                watcher.redirect_to_login();
            }
        });

        Self {
            store,
            router,
            _subscription: subscription,
        }
    }

    pub fn view(&self) -> ShellView {
        let identity = self.store.current();
        ShellView {
            logged_in: identity.is_some(),
            display_name: identity.map(|i| i.display_name().to_string()),
            location: self.router.location(),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn show_login(&self) {
        self.router.redirect_to_login();
    }

    pub fn show_signup(&self) {
        self.router.redirect_to_signup();
    }

    /// Signs in and opens the dashboard. An existing session surfaces as a
    /// recoverable `AuthError::SessionExists`; use `force_sign_in` then.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Navigation, AppError> {
        self.store.sign_in(email, password).await?;
        Ok(self.router.navigate(Route::Dashboard.path()).await)
    }

    pub async fn force_sign_in(&self, email: &str, password: &str) -> Result<Navigation, AppError> {
        self.store.force_sign_in(email, password).await?;
        Ok(self.router.navigate(Route::Dashboard.path()).await)
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AppError> {
        Ok(self.store.sign_up(email, password, display_name).await?)
    }

    /// Confirms the account and moves to the login view.
    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AppError> {
        self.store.confirm_sign_up(email, code).await?;
        self.router.redirect_to_login();
        Ok(())
    }

    /// The UI is logged out and on the login view even when the provider
    /// call fails; the error is still returned for display.
    pub async fn sign_out(&self) -> Result<(), AppError> {
        let result = self.store.sign_out().await;
        self.router.redirect_to_login();
        Ok(result?)
    }
}
