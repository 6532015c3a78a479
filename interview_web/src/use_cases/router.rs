use crate::domain::routes::{decode_query, find_by_name, find_by_path, full_path, normalize_path};
use crate::domain::{Browser, NavigationTarget, Resolution, RouteDescriptor, RouteError};
use crate::use_cases::guard::{GuardOutcome, NavigationGuard};
use std::sync::Arc;

// Upper bound on chained guard redirects within one navigation.
const MAX_REDIRECTS: usize = 4;

type AfterHook = Box<dyn Fn(&Resolution) + Send + Sync>;

// Resolves navigation targets against the route table and commits them to the browser.
pub struct Router {
    routes: &'static [RouteDescriptor],
    guard: NavigationGuard,
    browser: Arc<dyn Browser>,
    login_route: &'static str,
    after_hooks: Vec<AfterHook>,
}

impl Router {
    pub fn new(
        routes: &'static [RouteDescriptor],
        guard: NavigationGuard,
        browser: Arc<dyn Browser>,
        login_route: &'static str,
    ) -> Self {
        Self {
            routes,
            guard,
            browser,
            login_route,
            after_hooks: Vec::new(),
        }
    }

    pub fn routes(&self) -> &'static [RouteDescriptor] {
        self.routes
    }

    // Registers a post-transition hook (analytics and the like).
    pub fn after_each(&mut self, hook: impl Fn(&Resolution) + Send + Sync + 'static) {
        self.after_hooks.push(Box::new(hook));
    }

    // Any resolution failure falls back to the login route. Only fails if that also fails.
    #[tracing::instrument(name = "navigate", skip_all)]
    pub fn push(&self, target: impl Into<NavigationTarget>) -> Result<Resolution, RouteError> {
        match self.transition(target.into(), false) {
            Ok(resolution) => Ok(resolution),
            Err(err) => {
                tracing::error!(error = %err, "router error; falling back to login");
                self.transition(NavigationTarget::named(self.login_route), true)
            }
        }
    }

    fn transition(
        &self,
        target: NavigationTarget,
        redirected: bool,
    ) -> Result<Resolution, RouteError> {
        let mut target = target;
        let mut redirected = redirected;

        for _ in 0..=MAX_REDIRECTS {
            let (route, query) = self.resolve(&target)?;
            let location = full_path(route.path, &query);

            match self.guard.before_each(route, &location) {
                GuardOutcome::Proceed => return Ok(self.commit(route, query, redirected)),
                GuardOutcome::Redirect(next) => {
                    target = next;
                    redirected = true;
                }
            }
        }

        Err(RouteError::RedirectLoop(format!("{target:?}")))
    }

    fn resolve(
        &self,
        target: &NavigationTarget,
    ) -> Result<(&'static RouteDescriptor, Vec<(String, String)>), RouteError> {
        match target {
            NavigationTarget::Path(raw) => {
                let (path, query) = match raw.split_once('?') {
                    Some((path, query)) => (path, decode_query(query)),
                    None => (raw.as_str(), Vec::new()),
                };
                if !path.starts_with('/') {
                    return Err(RouteError::MalformedTarget(raw.clone()));
                }
                let route = find_by_path(self.routes, path)
                    .ok_or_else(|| RouteError::UnknownPath(normalize_path(path).to_string()))?;
                Ok((route, query))
            }
            NavigationTarget::Named { name, query } => {
                let route = find_by_name(self.routes, name)
                    .ok_or_else(|| RouteError::UnknownName(name.clone()))?;
                Ok((route, query.clone()))
            }
        }
    }

    fn commit(
        &self,
        route: &'static RouteDescriptor,
        query: Vec<(String, String)>,
        redirected: bool,
    ) -> Resolution {
        let resolution = Resolution {
            route,
            full_path: full_path(route.path, &query),
            query,
            redirected,
        };

        self.browser.navigate(&resolution.full_path);
        tracing::debug!(route = route.name, full_path = %resolution.full_path, redirected, "navigation committed");

        for hook in &self.after_hooks {
            hook(&resolution);
        }
        resolution
    }
}
