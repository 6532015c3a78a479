use crate::domain::{Browser, NavigationTarget, RouteDescriptor, SessionStore, USERNAME_KEY};
use std::sync::Arc;

// Query key carrying the originally requested location through a login redirect.
pub const REDIRECT_QUERY_KEY: &str = "redirect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Proceed,
    Redirect(NavigationTarget),
}

// Runs before every route transition. Policy comes only from route metadata.
#[derive(Clone)]
pub struct NavigationGuard {
    store: Arc<dyn SessionStore>,
    browser: Arc<dyn Browser>,
    app_name: String,
    login_route: &'static str,
}

impl NavigationGuard {
    pub fn new(
        store: Arc<dyn SessionStore>,
        browser: Arc<dyn Browser>,
        app_name: impl Into<String>,
        login_route: &'static str,
    ) -> Self {
        Self {
            store,
            browser,
            app_name: app_name.into(),
            login_route,
        }
    }

    pub fn before_each(&self, to: &RouteDescriptor, full_path: &str) -> GuardOutcome {
        if let Some(title) = to.meta.title {
            self.browser.set_title(&format!("{title} - {}", self.app_name));
        }

        let authenticated = self.store.get(USERNAME_KEY).is_some();
        if to.meta.requires_auth && !authenticated {
            tracing::info!(route = to.name, full_path, "auth required; redirecting to login");
            return GuardOutcome::Redirect(
                NavigationTarget::named(self.login_route).with_query(REDIRECT_QUERY_KEY, full_path),
            );
        }

        GuardOutcome::Proceed
    }
}
