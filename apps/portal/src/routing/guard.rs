use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::AuthError;
use crate::routing::Route;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Deny { redirect: Route },
}

/// Gates protected routes on the session store plus a provider re-check.
///
/// Any error, timeout or mismatch is a denial that redirects to the login
/// view. The login view is never protected, so denials cannot loop.
#[derive(Clone)]
pub struct RouteGuard {
    store: SessionStore,
    recheck_timeout: Duration,
}

impl RouteGuard {
    pub fn new(store: SessionStore, recheck_timeout: Duration) -> Self {
        Self {
            store,
            recheck_timeout,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub async fn check(&self, route: Route) -> GuardOutcome {
        if !route.is_protected() {
            return GuardOutcome::Allow;
        }

        match self.authorize().await {
            Ok(()) => {
                debug!("Allowing {}", route.path());
                GuardOutcome::Allow
            }
            Err(e) => {
                warn!("Denying {}: {e}", route.path());
                GuardOutcome::Deny {
                    redirect: Route::Login,
                }
            }
        }
    }

    async fn authorize(&self) -> Result<(), AuthError> {
        if !self.store.is_restored() {
            self.store.restore().await;
        }

        let generation = self.store.generation();
        let current = self.store.current().ok_or(AuthError::NoSession)?;

        let confirmed = tokio::time::timeout(self.recheck_timeout, self.store.revalidate())
            .await
            .map_err(|_| AuthError::Timeout)??;

        // A sign-in or sign-out landed while the re-check was in flight.
        if self.store.generation() != generation {
            return Err(AuthError::Stale);
        }
        if confirmed.stable_id != current.stable_id {
            return Err(AuthError::Stale);
        }
        Ok(())
    }
}
