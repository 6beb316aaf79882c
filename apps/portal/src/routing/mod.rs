use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

pub mod guard;

use guard::{GuardOutcome, RouteGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Profile,
}

impl Route {
    /// Applies the route table: the empty path and unknown paths go to the
    /// dashboard.
    pub fn resolve(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_matches('/') {
            "login" => Route::Login,
            "signup" => Route::Signup,
            "profile" => Route::Profile,
            _ => Route::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Profile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Entered(Route),
    Redirected { requested: Route, to: Route },
}

impl Navigation {
    pub fn landed_on(&self) -> Route {
        match self {
            Navigation::Entered(route) => *route,
            Navigation::Redirected { to, .. } => *to,
        }
    }
}

/// Holds the current location. Protected routes are entered only after the
/// guard has resolved.
#[derive(Clone)]
pub struct Router {
    guard: RouteGuard,
    location: Arc<Mutex<Option<Route>>>,
}

impl Router {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            location: Arc::new(Mutex::new(None)),
        }
    }

    pub fn location(&self) -> Option<Route> {
        *self.location.lock()
    }

    pub async fn navigate(&self, path: &str) -> Navigation {
        let requested = Route::resolve(path);

        if let GuardOutcome::Deny { redirect } = self.guard.check(requested).await {
            self.set_location(redirect);
            return Navigation::Redirected {
                requested,
                to: redirect,
            };
        }

        self.set_location(requested);

        // A sign-out may have been applied between the guard's answer and the
        // move; the shell's observer saw the old location then.
        if requested.is_protected() && !self.guard.store().is_authenticated() {
            self.set_location(Route::Login);
            return Navigation::Redirected {
                requested,
                to: Route::Login,
            };
        }
        Navigation::Entered(requested)
    }

    /// Unguarded move to the login view.
    pub fn redirect_to_login(&self) {
        self.set_location(Route::Login);
    }

    pub fn redirect_to_signup(&self) {
        self.set_location(Route::Signup);
    }

    fn set_location(&self, route: Route) {
        let mut location = self.location.lock();
        if *location != Some(route) {
            info!("Navigated to {}", route.path());
        }
        *location = Some(route);
    }
}
