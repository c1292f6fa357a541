//! Router / access gate
//!
//! A small state machine over a closed set of navigation addresses. Every
//! transition (initial load, programmatic redirect, user navigation) runs
//! through [`resolve`], a pure function of the requested address and the
//! session: authentication is checked before authorization, each rejection
//! substitutes a fallback address and re-enters the algorithm, and because
//! `/login` and `/` always settle, resolution is bounded. No transition can
//! fail; the worst outcome is a notice and a substitute page.

use std::fmt;

use crate::session::Session;
use crate::state::App;
use crate::view::{ViewId, ViewRegistry};

/// The closed navigation alphabet
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    VerifyEmail,
    Profile,
    Employees,
    Departments,
    Accounts,
    Requests,
}

/// Routes that require an authenticated session
const PROTECTED_ROUTES: [Route; 5] = [
    Route::Profile,
    Route::Employees,
    Route::Departments,
    Route::Accounts,
    Route::Requests,
];

/// Routes that additionally require the admin role
const ADMIN_ROUTES: [Route; 3] = [Route::Employees, Route::Departments, Route::Accounts];

impl Route {
    pub const DEFAULT: Route = Route::Home;

    /// Parse a navigation address. Returns None for anything outside the
    /// alphabet, including the empty address.
    pub fn parse(address: &str) -> Option<Route> {
        match address {
            "/" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/verify-email" => Some(Route::VerifyEmail),
            "/profile" => Some(Route::Profile),
            "/employees" => Some(Route::Employees),
            "/departments" => Some(Route::Departments),
            "/accounts" => Some(Route::Accounts),
            "/requests" => Some(Route::Requests),
            _ => None,
        }
    }

    pub fn address(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::VerifyEmail => "/verify-email",
            Route::Profile => "/profile",
            Route::Employees => "/employees",
            Route::Departments => "/departments",
            Route::Accounts => "/accounts",
            Route::Requests => "/requests",
        }
    }

    /// The page bound to this address (fixed bijective map)
    pub fn view(self) -> ViewId {
        match self {
            Route::Home => ViewId::Home,
            Route::Login => ViewId::Login,
            Route::Register => ViewId::Register,
            Route::VerifyEmail => ViewId::VerifyEmail,
            Route::Profile => ViewId::Profile,
            Route::Employees => ViewId::Employees,
            Route::Departments => ViewId::Departments,
            Route::Accounts => ViewId::Accounts,
            Route::Requests => ViewId::Requests,
        }
    }

    pub fn is_protected(self) -> bool {
        PROTECTED_ROUTES.contains(&self)
    }

    pub fn is_admin_only(self) -> bool {
        ADMIN_ROUTES.contains(&self)
    }
}

/// Signal emitted when the gate substitutes an address
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    AuthRequired,
    AccessDenied,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Notice::AuthRequired => "You must log in first.",
            Notice::AccessDenied => "Access denied. Admins only.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of one resolved transition
#[derive(Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The canonical settled address; the visible address is rewritten to it
    pub address: &'static str,
    pub route: Route,
    pub view: ViewId,
    /// True when the access gate substituted the requested address
    pub redirected: bool,
    pub notice: Option<Notice>,
}

/// Resolve a requested address against the session, independent of any
/// rendering. Empty and unrecognized addresses canonicalize to the default.
pub fn resolve(requested: &str, session: &Session) -> Resolution {
    let mut route = Route::parse(requested).unwrap_or(Route::DEFAULT);
    let mut redirected = false;
    let mut notice = None;

    // Authentication strictly before authorization: an unauthenticated user
    // asking for an admin page goes to login, since role cannot be judged
    // without an identity. Each substitution re-enters the checks; login and
    // the default address always settle, so this terminates.
    loop {
        if route.is_protected() && !session.is_authenticated() {
            notice = Some(Notice::AuthRequired);
            redirected = true;
            route = Route::Login;
            continue;
        }
        if route.is_admin_only() && session.is_authenticated() && !session.is_admin() {
            notice = Some(Notice::AccessDenied);
            redirected = true;
            route = Route::DEFAULT;
            continue;
        }
        break;
    }

    Resolution {
        address: route.address(),
        route,
        view: route.view(),
        redirected,
        notice,
    }
}

/// State machine over the current address. Applying a resolution activates
/// exactly one view and triggers its refresh through the registry.
pub struct Router {
    current: String,
}

impl Router {
    pub fn new() -> Self {
        Self {
            current: Route::DEFAULT.address().to_string(),
        }
    }

    pub fn current_address(&self) -> &str {
        &self.current
    }

    /// Run one transition: resolve, rewrite the current address, activate
    /// the settled view, refresh it. Never fails.
    pub fn navigate(
        &mut self,
        requested: &str,
        app: &App,
        views: &mut ViewRegistry,
    ) -> Resolution {
        let resolution = resolve(requested, &app.session);

        if let Some(notice) = resolution.notice {
            tracing::warn!(
                "Navigation to {} rejected ({}), settling on {}",
                requested,
                notice,
                resolution.address
            );
        } else {
            tracing::debug!("Navigated to {}", resolution.address);
        }

        self.current = resolution.address.to_string();
        views.activate(resolution.view, app);
        resolution
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entity::{Account, Role};
    use crate::store::{MemoryStorage, Store};
    use crate::view::DataKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session_with_role(role: Role) -> Session {
        let mut store = Store::seed();
        store.accounts.push(Account {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            password: "pw1234".to_string(),
            role,
            verified: true,
        });
        let mut backend = MemoryStorage::new();
        let mut session = Session::new();
        session
            .login(&store, &mut backend, "a@x.com", "pw1234")
            .unwrap();
        session
    }

    #[test]
    fn test_public_addresses_settle_without_redirect() {
        let session = Session::new();
        for address in ["/", "/login", "/register", "/verify-email"] {
            let res = resolve(address, &session);
            assert_eq!(res.address, address);
            assert!(!res.redirected);
            assert_eq!(res.notice, None);
        }
    }

    #[test]
    fn test_protected_addresses_redirect_to_login_when_logged_out() {
        let session = Session::new();
        for route in PROTECTED_ROUTES {
            let res = resolve(route.address(), &session);
            assert_eq!(res.address, "/login");
            assert_eq!(res.view, ViewId::Login);
            assert!(res.redirected);
            assert_eq!(res.notice, Some(Notice::AuthRequired));
        }
    }

    #[test]
    fn test_admin_addresses_redirect_home_for_non_admin() {
        let session = session_with_role(Role::User);
        for route in ADMIN_ROUTES {
            let res = resolve(route.address(), &session);
            assert_eq!(res.address, "/");
            assert!(res.redirected);
            assert_eq!(res.notice, Some(Notice::AccessDenied));
        }
    }

    #[test]
    fn test_admin_addresses_settle_for_admin() {
        let session = session_with_role(Role::Admin);
        for route in ADMIN_ROUTES {
            let res = resolve(route.address(), &session);
            assert_eq!(res.address, route.address());
            assert!(!res.redirected);
        }
    }

    #[test]
    fn test_non_admin_keeps_profile_and_requests() {
        let session = session_with_role(Role::User);
        for address in ["/profile", "/requests"] {
            let res = resolve(address, &session);
            assert_eq!(res.address, address);
            assert!(!res.redirected);
        }
    }

    #[test]
    fn test_auth_checked_before_role() {
        // Logged out + admin-only address: login, not access-denied
        let session = Session::new();
        let res = resolve("/accounts", &session);
        assert_eq!(res.address, "/login");
        assert_eq!(res.notice, Some(Notice::AuthRequired));
    }

    #[test]
    fn test_unknown_and_empty_addresses_canonicalize() {
        let session = Session::new();
        for address in ["", "/bogus", "/accounts/7"] {
            let res = resolve(address, &session);
            assert_eq!(res.address, "/");
            assert_eq!(res.view, ViewId::Home);
            assert!(!res.redirected);
            assert_eq!(res.notice, None);
        }
    }

    #[test]
    fn test_navigate_refreshes_settled_view_exactly_once() {
        let mut app = App::with_storage(Config::default(), Box::new(MemoryStorage::new()));
        app.store.accounts.push(Account {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "a@x.com".to_string(),
            password: "pw1234".to_string(),
            role: Role::User,
            verified: true,
        });
        app.login("a@x.com", "pw1234").unwrap();

        let profile_refreshes = Rc::new(RefCell::new(0));
        let mut views = ViewRegistry::new();
        {
            let counter = Rc::clone(&profile_refreshes);
            views.register(
                ViewId::Profile,
                &[DataKind::Accounts, DataKind::Session],
                Box::new(move |_| *counter.borrow_mut() += 1),
            );
        }
        views.register_static(ViewId::Home);

        let mut router = Router::new();

        // Authenticated non-admin asking for an admin page lands home
        let res = router.navigate("/employees", &app, &mut views);
        assert_eq!(res.address, "/");
        assert_eq!(router.current_address(), "/");
        assert_eq!(views.active(), Some(ViewId::Home));
        assert_eq!(*profile_refreshes.borrow(), 0);

        // Profile settles and refreshes exactly once
        let res = router.navigate("/profile", &app, &mut views);
        assert!(!res.redirected);
        assert_eq!(router.current_address(), "/profile");
        assert_eq!(*profile_refreshes.borrow(), 1);
    }
}
