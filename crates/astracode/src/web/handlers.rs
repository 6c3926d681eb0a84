use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{page, sessions, AppState};
use crate::codegen::{actions, Notice};
use astracode_core::codegen::{Action, Selections, SessionState};

/// Fields posted by the page form. Missing fields default to empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FormInput {
    query: String,
    language: String,
    theme: String,
    complexity: String,
    keywords: String,
    style: String,
}

impl FormInput {
    fn selections(&self) -> Selections {
        Selections::from_form(
            &self.query,
            &self.language,
            &self.theme,
            &self.complexity,
            &self.keywords,
            &self.style,
        )
    }
}

pub async fn index(State(app): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let (id, is_new) = sessions::resolve(&headers);
    let state = current_state(&app, &id).await;
    render(&app, &state, None, is_new.then_some(id))
}

pub async fn api_state(
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Json<SessionState> {
    let (id, _) = sessions::resolve(&headers);
    Json(current_state(&app, &id).await)
}

/// Snapshot of a session, or the empty state when there is none yet.
async fn current_state(app: &AppState, id: &str) -> SessionState {
    match app.sessions.get(id).await {
        Some(session) => session.lock().await.clone(),
        None => SessionState::default(),
    }
}

pub async fn generate(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    form: Form<FormInput>,
) -> Response {
    handle(Action::Generate, state, headers, form).await
}

pub async fn alternative(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    form: Form<FormInput>,
) -> Response {
    handle(Action::Alternative, state, headers, form).await
}

pub async fn optimize(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    form: Form<FormInput>,
) -> Response {
    handle(Action::Optimize, state, headers, form).await
}

pub async fn explain(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    form: Form<FormInput>,
) -> Response {
    handle(Action::Explain, state, headers, form).await
}

pub async fn clear(
    state: State<Arc<AppState>>,
    headers: HeaderMap,
    form: Form<FormInput>,
) -> Response {
    handle(Action::Clear, state, headers, form).await
}

async fn handle(
    action: Action,
    State(app): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(input): Form<FormInput>,
) -> Response {
    let (id, is_new) = sessions::resolve(&headers);
    let session = app.sessions.get_or_create(&id).await;
    let mut guard = session.lock().await;

    // The stored state stays in place until the action finishes, so a
    // dropped request leaves the session as it was.
    let current = guard.clone().with_selections(input.selections());
    log::debug!("Session {id}: {action}");

    let backend = app.backend.as_ref().map(|b| b.as_ref());
    let outcome = actions::run(action, current, backend, &app.settings).await;
    if let Some(Notice::Error(message)) = &outcome.notice {
        log::error!("Session {id}: {action} failed: {message}");
    }

    *guard = outcome.state;
    render(&app, &guard, outcome.notice.as_ref(), is_new.then_some(id))
}

fn render(
    app: &AppState,
    state: &SessionState,
    notice: Option<&Notice>,
    new_session: Option<String>,
) -> Response {
    let config_error = app.backend.as_ref().err();
    let body = Html(page::render(state, notice, config_error));

    match new_session {
        Some(id) => ([(header::SET_COOKIE, sessions::set_cookie_value(&id))], body).into_response(),
        None => body.into_response(),
    }
}
