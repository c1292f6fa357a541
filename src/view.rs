//! View registry
//!
//! The rendering layer registers its pages here; the core only ever talks to
//! this registry. Exactly one view is active at a time. Views that mirror
//! live data register a zero-argument refresh callback together with the
//! data kinds they mirror; the registry re-invokes the callback when the
//! view becomes active and when a committed mutation touches one of those
//! kinds. Refresh callbacks must be idempotent and safe to call repeatedly.

use std::collections::HashMap;

use crate::state::App;

/// Page identifiers, one per navigation address
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewId {
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

impl ViewId {
    /// Stable page name, usable as an element id by a rendering layer
    pub fn name(self) -> &'static str {
        match self {
            ViewId::Home => "home-page",
            ViewId::Login => "login-page",
            ViewId::Register => "register-page",
            ViewId::VerifyEmail => "verify-email-page",
            ViewId::Profile => "profile-page",
            ViewId::Employees => "employees-page",
            ViewId::Departments => "departments-page",
            ViewId::Accounts => "accounts-page",
            ViewId::Requests => "requests-page",
        }
    }
}

/// The kinds of data a view can mirror. Mutations report the kinds they
/// touched; session changes count as a kind of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataKind {
    Accounts,
    Departments,
    Employees,
    Requests,
    Session,
}

/// Zero-argument refresh callback over the application context
pub type RefreshFn = Box<dyn FnMut(&App)>;

struct ViewBinding {
    interests: Vec<DataKind>,
    refresh: Option<RefreshFn>,
}

/// Holds every registered view and the single active one
#[derive(Default)]
pub struct ViewRegistry {
    bindings: HashMap<ViewId, ViewBinding>,
    active: Option<ViewId>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live-data view with the kinds it mirrors
    pub fn register(&mut self, view: ViewId, interests: &[DataKind], refresh: RefreshFn) {
        self.bindings.insert(
            view,
            ViewBinding {
                interests: interests.to_vec(),
                refresh: Some(refresh),
            },
        );
    }

    /// Register a static view with no data to refresh
    pub fn register_static(&mut self, view: ViewId) {
        self.bindings.insert(
            view,
            ViewBinding {
                interests: Vec::new(),
                refresh: None,
            },
        );
    }

    pub fn active(&self) -> Option<ViewId> {
        self.active
    }

    /// Deactivate whatever is active, activate `view`, and run its refresh
    /// callback exactly once, after activation.
    pub fn activate(&mut self, view: ViewId, app: &App) {
        self.active = Some(view);
        if let Some(binding) = self.bindings.get_mut(&view) {
            if let Some(refresh) = binding.refresh.as_mut() {
                refresh(app);
            }
        }
    }

    /// Refresh the active view iff a changed kind intersects its interests.
    /// Inactive views are never refreshed; they pull fresh data on their
    /// next activation instead.
    pub fn publish(&mut self, app: &App, changed: &[DataKind]) {
        let Some(active) = self.active else {
            return;
        };
        let Some(binding) = self.bindings.get_mut(&active) else {
            return;
        };
        if binding.interests.iter().any(|k| changed.contains(k)) {
            if let Some(refresh) = binding.refresh.as_mut() {
                refresh(app);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::store::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_app() -> App {
        App::with_storage(Config::default(), Box::new(MemoryStorage::new()))
    }

    fn counting_registry(counter: &Rc<RefCell<u32>>) -> ViewRegistry {
        let mut views = ViewRegistry::new();
        let counter = Rc::clone(counter);
        views.register(
            ViewId::Departments,
            &[DataKind::Departments],
            Box::new(move |_| *counter.borrow_mut() += 1),
        );
        views.register_static(ViewId::Home);
        views
    }

    #[test]
    fn test_activate_refreshes_exactly_once() {
        let app = test_app();
        let counter = Rc::new(RefCell::new(0));
        let mut views = counting_registry(&counter);

        views.activate(ViewId::Departments, &app);
        assert_eq!(views.active(), Some(ViewId::Departments));
        assert_eq!(*counter.borrow(), 1);
    }

    #[test]
    fn test_publish_refreshes_interested_active_view() {
        let app = test_app();
        let counter = Rc::new(RefCell::new(0));
        let mut views = counting_registry(&counter);

        views.activate(ViewId::Departments, &app);
        views.publish(&app, &[DataKind::Departments]);
        assert_eq!(*counter.borrow(), 2);

        // Disjoint change kinds do not refresh
        views.publish(&app, &[DataKind::Requests, DataKind::Session]);
        assert_eq!(*counter.borrow(), 2);
    }

    #[test]
    fn test_publish_ignores_inactive_views() {
        let app = test_app();
        let counter = Rc::new(RefCell::new(0));
        let mut views = counting_registry(&counter);

        views.activate(ViewId::Home, &app);
        views.publish(&app, &[DataKind::Departments]);
        assert_eq!(*counter.borrow(), 0);
        assert_eq!(views.active(), Some(ViewId::Home));
    }

    #[test]
    fn test_view_names() {
        assert_eq!(ViewId::Home.name(), "home-page");
        assert_eq!(ViewId::VerifyEmail.name(), "verify-email-page");
    }
}
