//! Session store: the single owner of the current `Identity`.
//!
//! Every transition writes one shared cell and then notifies observers
//! synchronously, in subscription order, before the call returns. Emissions
//! are serialized by `emit_lock`, so two transitions never interleave their
//! notifications.
//!
//! Mutating calls draw a ticket when they start. A completion is applied only
//! if no later-started call has been applied already, so a slow sign-in that
//! finishes after a sign-out cannot resurrect the cleared identity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::errors::AuthError;
use crate::identity::{IdentityProvider, SignUpOutcome};
use crate::models::identity::Identity;

pub mod flags;

type Observer = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

#[derive(Default)]
struct CellState {
    applied: u64,
    restored: bool,
}

struct Inner {
    provider: Arc<dyn IdentityProvider>,
    cell: watch::Sender<Option<Identity>>,
    state: Mutex<CellState>,
    tickets: AtomicU64,
    observers: Mutex<Vec<(u64, Observer)>>,
    next_observer: AtomicU64,
    emit_lock: ReentrantMutex<()>,
}

/// Cheap to clone; all clones share the same cell and observers.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

/// Observer registration. Dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.observers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

impl SessionStore {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (cell, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                provider,
                cell,
                state: Mutex::new(CellState::default()),
                tickets: AtomicU64::new(0),
                observers: Mutex::new(Vec::new()),
                next_observer: AtomicU64::new(0),
                emit_lock: ReentrantMutex::new(()),
            }),
        }
    }

    /// Last known identity.
    pub fn current(&self) -> Option<Identity> {
        self.inner.cell.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.cell.borrow().is_some()
    }

    /// True once any transition (restore, sign-in, sign-out) has been applied.
    pub fn is_restored(&self) -> bool {
        self.inner.state.lock().restored
    }

    /// Registers `observer`. It is called immediately with the current value,
    /// then once per transition until the returned handle is dropped.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(Option<&Identity>) + Send + Sync + 'static,
    {
        let _emit = self.inner.emit_lock.lock();
        let id = self.inner.next_observer.fetch_add(1, Ordering::SeqCst);
        let observer: Observer = Arc::new(observer);
        self.inner.observers.lock().push((id, Arc::clone(&observer)));

        let current = self.current();
        observer(current.as_ref());

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Async view of the same cell for task-based consumers. New receivers
    /// see the latest value only.
    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.cell.subscribe()
    }

    /// Ticket of the last applied transition. Any change means the session
    /// moved on since the value was read.
    pub fn generation(&self) -> u64 {
        self.inner.state.lock().applied
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.lock().len()
    }

    fn next_ticket(&self) -> u64 {
        self.inner.tickets.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Writes the cell and fans out. Returns false if a later call already won.
    fn apply(&self, ticket: u64, next: Option<Identity>) -> bool {
        let _emit = self.inner.emit_lock.lock();
        {
            let mut state = self.inner.state.lock();
            if ticket <= state.applied {
                debug!(
                    "Discarding stale session result (ticket {ticket}, applied {})",
                    state.applied
                );
                return false;
            }
            state.applied = ticket;
            state.restored = true;
        }
        self.inner.cell.send_replace(next.clone());

        let observers: Vec<Observer> = self
            .inner
            .observers
            .lock()
            .iter()
            .map(|(_, o)| Arc::clone(o))
            .collect();
        for observer in observers {
            observer(next.as_ref());
        }
        true
    }

    /// Asks the provider for the current session. Failure means "no identity";
    /// this never returns an error.
    pub async fn restore(&self) {
        let ticket = self.next_ticket();
        let next = match self.inner.provider.current_identity().await {
            Ok(identity) => {
                info!("Restored session for {}", identity.handle);
                Some(identity)
            }
            Err(e) => {
                debug!("No session restored: {e}");
                None
            }
        };
        self.apply(ticket, next);
    }

    /// Provider re-check without touching the cell.
    pub async fn revalidate(&self) -> Result<Identity, AuthError> {
        self.inner.provider.current_identity().await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let ticket = self.next_ticket();
        self.inner.provider.sign_in(email, password).await?;

        match self.inner.provider.current_identity().await {
            Ok(identity) => {
                if self.apply(ticket, Some(identity.clone())) {
                    info!("Signed in as {}", identity.handle);
                    Ok(identity)
                } else {
                    warn!("Sign-in for {email} completed after a later session change");
                    // The provider now holds a session nobody sees. Drop it
                    // unless a newer sign-in owns it.
                    if self.current().is_none() {
                        if let Err(e) = self.inner.provider.sign_out().await {
                            warn!("Failed to drop superseded provider session: {e}");
                        }
                    }
                    Err(AuthError::Superseded)
                }
            }
            Err(e) => {
                self.apply(ticket, None);
                Err(e)
            }
        }
    }

    /// Signs out then signs in again. A failing sign-out is logged and ignored
    /// since the sign-in is what the user asked for.
    pub async fn force_sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if let Err(e) = self.sign_out().await {
            warn!("Ignoring sign-out failure before forced sign-in: {e}");
        }
        self.sign_in(email, password).await
    }

    /// Clears the local identity whatever the provider says, then reports the
    /// provider's result.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let ticket = self.next_ticket();
        let result = self.inner.provider.sign_out().await;
        if self.apply(ticket, None) {
            info!("Signed out");
        }
        result
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let outcome = self
            .inner
            .provider
            .sign_up(email, password, display_name)
            .await?;
        info!("Sign-up started for {email}: {:?}", outcome.next_step);
        Ok(outcome)
    }

    pub async fn confirm_sign_up(&self, email: &str, code: &str) -> Result<(), AuthError> {
        self.inner.provider.confirm_sign_up(email, code).await?;
        info!("Sign-up confirmed for {email}");
        Ok(())
    }
}
