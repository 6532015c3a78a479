use crate::domain::{Browser, SessionStore, ToastSink};
use crate::frameworks::config::ClientConfig;
use crate::interface_adapters::api::Api;
use crate::interface_adapters::browser::InMemoryBrowser;
use crate::interface_adapters::http::{ClientInitError, HttpClient};
use crate::interface_adapters::notify::TracingToastSink;
use crate::interface_adapters::routes::{ROUTES, names, paths};
use crate::interface_adapters::storage::FileSessionStore;
use crate::use_cases::classify::ErrorClassifier;
use crate::use_cases::guard::NavigationGuard;
use crate::use_cases::router::Router;
use crate::use_cases::session;
use std::sync::Arc;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Everything the hosting shell needs, wired against shared session and browser state.
pub struct App {
    pub store: Arc<dyn SessionStore>,
    pub browser: Arc<dyn Browser>,
    pub client: HttpClient,
    pub api: Api,
    pub router: Router,
}

impl App {
    pub fn build(
        config: &ClientConfig,
        store: Arc<dyn SessionStore>,
        browser: Arc<dyn Browser>,
        toasts: Option<Arc<dyn ToastSink>>,
    ) -> Result<Self, ClientInitError> {
        let classifier = ErrorClassifier::new(Arc::clone(&store), Arc::clone(&browser), toasts);
        let client = HttpClient::new(
            config.api_base_url.clone(),
            config.timeout,
            config.download_dir.clone(),
            Arc::clone(&store),
            classifier,
        )?;
        tracing::debug!(api_base_url = %client.base_url(), "api client configured.");

        let api = Api::new(Arc::new(client.clone()));
        let guard = NavigationGuard::new(
            Arc::clone(&store),
            Arc::clone(&browser),
            config.app_name.clone(),
            names::LOGIN,
        );
        let mut router = Router::new(&ROUTES, guard, Arc::clone(&browser), names::LOGIN);
        router.after_each(|resolution| {
            tracing::info!(route = resolution.route.name, full_path = %resolution.full_path, "page view");
        });

        Ok(Self {
            store,
            browser,
            client,
            api,
            router,
        })
    }
}

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = match ClientConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return;
        }
    };

    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::open(&config.session_file));
    let browser: Arc<dyn Browser> = Arc::new(InMemoryBrowser::new(paths::LOGIN));
    let toasts: Arc<dyn ToastSink> = Arc::new(TracingToastSink);

    let app = match App::build(&config, store, browser, Some(toasts)) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to build api client");
            return;
        }
    };

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| paths::HOME.to_string());
    let resolution = match app.router.push(target.as_str()) {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(error = %e, "navigation failed");
            return;
        }
    };
    tracing::info!(
        route = resolution.route.name,
        view = ?resolution.route.view,
        redirected = resolution.redirected,
        "view mounted"
    );

    if !session::is_authenticated(app.store.as_ref()) {
        tracing::info!("not logged in; skipping interviewee fetch");
        return;
    }

    // Failures were already classified and surfaced as toasts.
    match app.api.interviewee.get_all().await {
        Ok(interviewees) => tracing::info!(%interviewees, "interviewees loaded"),
        Err(e) => tracing::debug!(error = %e, "interviewee fetch failed"),
    }
}
