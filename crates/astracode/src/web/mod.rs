mod handlers;
mod page;
mod sessions;

use crate::prelude::{eprintln, *};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::completion::{CompletionBackend, GroqBackend, Settings};
use sessions::{SessionStore, DEFAULT_IDLE_MINUTES, DEFAULT_MAX_SESSIONS};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "ASTRACODE_PORT", default_value = "8501")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "ASTRACODE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Maximum number of sessions kept in memory
    #[arg(long, env = "ASTRACODE_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub max_sessions: usize,

    /// Minutes of inactivity after which a session is dropped
    #[arg(long, env = "ASTRACODE_SESSION_IDLE_MINUTES", default_value_t = DEFAULT_IDLE_MINUTES)]
    pub session_idle_minutes: u64,
}

/// State shared by every request.
pub struct AppState {
    /// The completion backend, or the configuration error that prevented
    /// building one.
    pub backend: Result<Arc<dyn CompletionBackend>, Error>,
    pub settings: Settings,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(backend: Result<Arc<dyn CompletionBackend>, Error>, settings: Settings) -> Self {
        Self {
            backend,
            settings,
            sessions: SessionStore::default(),
        }
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/generate", post(handlers::generate))
        .route("/alternative", post(handlers::alternative))
        .route("/optimize", post(handlers::optimize))
        .route("/explain", post(handlers::explain))
        .route("/clear", post(handlers::clear))
        .route("/api/state", get(handlers::api_state))
        .layer(cors)
        .with_state(state)
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let backend: Result<Arc<dyn CompletionBackend>, Error> =
        GroqBackend::from_global(&global).map(|b| Arc::new(b) as Arc<dyn CompletionBackend>);

    if let Err(err) = &backend {
        log::error!("{err}");
        eprintln!("{err}");
        eprintln!("The UI will start, but generation is disabled.");
    }

    let sessions = SessionStore::new(
        options.max_sessions,
        Duration::from_secs(options.session_idle_minutes.saturating_mul(60)),
    );
    let app_state =
        Arc::new(AppState::new(backend, Settings::from_global(&global)).with_sessions(sessions));
    let addr = format!("{}:{}", options.host, options.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Serving on http://{addr}");
    if global.verbose {
        eprintln!("AstraCode listening on http://{}", addr);
        eprintln!(
            "Models: {} (backup: {})",
            app_state.settings.primary_model, app_state.settings.backup_model
        );
    }

    axum::serve(listener, router(app_state))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}
