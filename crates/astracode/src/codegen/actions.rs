use serde::Serialize;

use crate::completion::{complete_with_policy, CompletionBackend, Settings};
use crate::prelude::*;
use astracode_core::codegen::{
    build_alternative_prompt, build_explain_prompt, build_optimize_prompt, build_prompt,
    extract_code, Action, GenerationRequest, GenerationResult, Language, SessionState,
};

/// A single user-visible message produced by an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "level", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Warning(message) | Notice::Error(message) => message,
        }
    }
}

impl From<Error> for Notice {
    fn from(err: Error) -> Self {
        if err.is_warning() {
            Notice::Warning(err.to_string())
        } else {
            Notice::Error(err.to_string())
        }
    }
}

/// New session state plus at most one message for the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub state: SessionState,
    pub notice: Option<Notice>,
}

impl ActionOutcome {
    fn ok(state: SessionState) -> Self {
        Self {
            state,
            notice: None,
        }
    }

    /// Keep `state` untouched and report `err`.
    fn failed(state: SessionState, err: Error) -> Self {
        Self {
            state,
            notice: Some(err.into()),
        }
    }
}

/// Apply `action` to `state`.
///
/// `backend` is the configuration error when no completion backend could be
/// built; every action except Clear is then declined.
pub async fn run(
    action: Action,
    state: SessionState,
    backend: Result<&dyn CompletionBackend, &Error>,
    settings: &Settings,
) -> ActionOutcome {
    if action == Action::Clear {
        return clear(state);
    }

    let backend = match backend {
        Ok(backend) => backend,
        Err(err) => return ActionOutcome::failed(state, err.clone()),
    };

    match action {
        Action::Generate => generate(state, backend, settings).await,
        Action::Alternative => alternative(state, backend, settings).await,
        Action::Optimize => optimize(state, backend, settings).await,
        Action::Explain => explain(state, backend, settings).await,
        Action::Clear => clear(state),
    }
}

/// Generate base code from the current selections, falling back to the backup
/// model once.
pub async fn generate(
    state: SessionState,
    backend: &dyn CompletionBackend,
    settings: &Settings,
) -> ActionOutcome {
    let request = state.selections.request();
    if !request.has_query() {
        return ActionOutcome::failed(state, Error::EmptyInput);
    }

    let prompt = build_prompt(&request);
    let params = settings.code_params(request.complexity);
    let language = request.language;

    match complete_with_policy(
        backend,
        &settings.generation_policy(),
        &prompt,
        &params,
        |text| accept_code(&text, language),
    )
    .await
    {
        Ok((code, source_model)) => ActionOutcome::ok(state.with_generated(
            request,
            GenerationResult { code, source_model },
        )),
        Err(err) => ActionOutcome::failed(state, err),
    }
}

/// Ask for a different approach to the request that produced the base code.
pub async fn alternative(
    state: SessionState,
    backend: &dyn CompletionBackend,
    settings: &Settings,
) -> ActionOutcome {
    let Some((request, _)) = base_of(&state) else {
        return unavailable(state, Action::Alternative);
    };

    let prompt = build_alternative_prompt(&request);
    let params = settings.code_params(request.complexity);
    let language = request.language;

    match complete_with_policy(
        backend,
        &settings.derived_policy(),
        &prompt,
        &params,
        |text| accept_code(&text, language),
    )
    .await
    {
        Ok((code, source_model)) => {
            ActionOutcome::ok(state.with_alternative(GenerationResult { code, source_model }))
        }
        Err(err) => ActionOutcome::failed(state, err),
    }
}

/// Ask for an optimized rewrite of the base code.
pub async fn optimize(
    state: SessionState,
    backend: &dyn CompletionBackend,
    settings: &Settings,
) -> ActionOutcome {
    let Some((request, code)) = base_of(&state) else {
        return unavailable(state, Action::Optimize);
    };

    let prompt = build_optimize_prompt(&code, request.language, request.complexity);
    let params = settings.code_params(request.complexity);
    let language = request.language;

    match complete_with_policy(
        backend,
        &settings.derived_policy(),
        &prompt,
        &params,
        |text| accept_code(&text, language),
    )
    .await
    {
        Ok((code, source_model)) => {
            ActionOutcome::ok(state.with_optimized(GenerationResult { code, source_model }))
        }
        Err(err) => ActionOutcome::failed(state, err),
    }
}

/// Ask for a prose explanation of the base code. The reply is not fence-extracted.
pub async fn explain(
    state: SessionState,
    backend: &dyn CompletionBackend,
    settings: &Settings,
) -> ActionOutcome {
    let Some((request, code)) = base_of(&state) else {
        return unavailable(state, Action::Explain);
    };

    let prompt = build_explain_prompt(&code, request.language, request.complexity);

    match complete_with_policy(
        backend,
        &settings.derived_policy(),
        &prompt,
        &settings.explain_params(),
        |text| {
            let text = text.trim();
            if text.is_empty() {
                Err(Error::Generation("Model returned an empty explanation".to_string()))
            } else {
                Ok(text.to_string())
            }
        },
    )
    .await
    {
        Ok((explanation, _)) => ActionOutcome::ok(state.with_explanation(explanation)),
        Err(err) => ActionOutcome::failed(state, err),
    }
}

pub fn clear(state: SessionState) -> ActionOutcome {
    ActionOutcome::ok(state.cleared())
}

/// Request and code of the current base generation.
fn base_of(state: &SessionState) -> Option<(GenerationRequest, String)> {
    state
        .base()
        .map(|(request, result)| (request.clone(), result.code.clone()))
}

fn unavailable(state: SessionState, action: Action) -> ActionOutcome {
    ActionOutcome::failed(state, Error::ActionUnavailable(action.to_string()))
}

/// Extract code from a completion; an unterminated fence or an empty result
/// counts as a failed attempt.
fn accept_code(text: &str, language: Language) -> Result<String, Error> {
    let code = extract_code(text, language).map_err(|e| Error::Generation(e.to_string()))?;
    if code.is_empty() {
        return Err(Error::Generation("Model returned no code".to_string()));
    }
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::testing::{fail, ScriptedBackend};
    use astracode_core::codegen::{ComplexityTier, Selections};

    fn settings() -> Settings {
        Settings {
            primary_model: "primary".to_string(),
            backup_model: "backup".to_string(),
            ..Settings::default()
        }
    }

    fn with_query(query: &str) -> SessionState {
        SessionState::default().with_selections(Selections {
            query: query.to_string(),
            ..Selections::default()
        })
    }

    async fn generated() -> SessionState {
        let backend = ScriptedBackend::new([Ok("```python\nprint(1)\n```".to_string())]);
        generate(with_query("print one"), &backend, &settings())
            .await
            .state
    }

    #[tokio::test]
    async fn test_generate_populates_slot_from_primary() {
        let backend =
            ScriptedBackend::new([Ok("Here is code:\n```python\nprint(1)\n```".to_string())]);

        let outcome = generate(with_query("print one"), &backend, &settings()).await;

        assert_eq!(outcome.notice, None);
        let result = outcome.state.generated.unwrap();
        assert_eq!(result.code, "print(1)");
        assert_eq!(result.source_model, "primary");
        assert!(backend.prompts()[0].contains("print one in Python."));
    }

    #[tokio::test]
    async fn test_backup_success_is_silent() {
        let backend = ScriptedBackend::new([fail("503"), Ok("print(2)".to_string())]);

        let outcome = generate(with_query("print two"), &backend, &settings()).await;

        assert_eq!(outcome.notice, None);
        let result = outcome.state.generated.unwrap();
        assert_eq!(result.code, "print(2)");
        assert_eq!(result.source_model, "backup");
    }

    #[tokio::test]
    async fn test_both_models_failing_yields_one_error_and_no_result() {
        let backend = ScriptedBackend::new([fail("503"), fail("429")]);

        let outcome = generate(with_query("print two"), &backend, &settings()).await;

        assert!(outcome.state.generated.is_none());
        assert!(matches!(outcome.notice, Some(Notice::Error(_))));
        assert!(outcome.notice.unwrap().message().contains("429"));
        assert_eq!(backend.models(), vec!["primary", "backup"]);
    }

    #[tokio::test]
    async fn test_failed_generation_keeps_previous_slots() {
        let previous = generated().await;
        let backend = ScriptedBackend::new([fail("503"), fail("503")]);

        let outcome = generate(previous.clone(), &backend, &settings()).await;

        assert_eq!(outcome.state, previous);
    }

    #[tokio::test]
    async fn test_truncated_primary_falls_back() {
        let backend = ScriptedBackend::new([
            Ok("```python\ndef f(".to_string()),
            Ok("```python\ndef f(): pass\n```".to_string()),
        ]);

        let outcome = generate(with_query("f"), &backend, &settings()).await;

        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.state.generated.unwrap().source_model, "backup");
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_before_network() {
        let backend = ScriptedBackend::new([]);

        let outcome = generate(with_query("  \n "), &backend, &settings()).await;

        assert_eq!(outcome.notice, Some(Notice::from(Error::EmptyInput)));
        assert!(matches!(outcome.notice, Some(Notice::Warning(_))));
        assert!(backend.models().is_empty());
    }

    #[tokio::test]
    async fn test_derived_actions_unavailable_without_base_code() {
        let backend = ScriptedBackend::new([]);
        let state = with_query("anything");

        for action in [Action::Alternative, Action::Optimize, Action::Explain] {
            let outcome = run(action, state.clone(), Ok(&backend), &settings()).await;
            assert_eq!(outcome.state, state);
            assert!(matches!(outcome.notice, Some(Notice::Warning(_))));
        }
        assert!(backend.models().is_empty());
    }

    #[tokio::test]
    async fn test_new_generation_clears_derived_slots() {
        let backend = ScriptedBackend::new([
            Ok("print(2)".to_string()),
            Ok("print(3)".to_string()),
            Ok("It prints.".to_string()),
            Ok("print(4)".to_string()),
        ]);
        let state = generated().await;
        let state = alternative(state, &backend, &settings()).await.state;
        let state = optimize(state, &backend, &settings()).await.state;
        let state = explain(state, &backend, &settings()).await.state;
        assert!(state.alternative.is_some());
        assert!(state.optimized.is_some());
        assert!(state.explanation.is_some());

        let state = generate(state, &backend, &settings()).await.state;

        assert_eq!(state.generated.unwrap().code, "print(4)");
        assert!(state.alternative.is_none());
        assert!(state.optimized.is_none());
        assert!(state.explanation.is_none());
    }

    #[tokio::test]
    async fn test_alternative_uses_primary_only_and_rewraps_query() {
        let state = generated().await;
        let backend = ScriptedBackend::new([fail("503"), Ok("unused".to_string())]);

        let outcome = alternative(state.clone(), &backend, &settings()).await;

        assert!(matches!(outcome.notice, Some(Notice::Error(_))));
        assert_eq!(outcome.state, state);
        assert_eq!(backend.models(), vec!["primary"]);
        assert!(backend.prompts()[0].contains("Alternative approach for: print one"));
    }

    #[tokio::test]
    async fn test_optimize_sends_current_code() {
        let state = generated().await;
        let backend = ScriptedBackend::new([Ok("```python\nprint(1)  # fast\n```".to_string())]);

        let outcome = optimize(state, &backend, &settings()).await;

        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.state.optimized.unwrap().code, "print(1)  # fast");
        assert!(backend.prompts()[0].contains("```python\nprint(1)\n```"));
    }

    #[tokio::test]
    async fn test_explain_keeps_prose_and_uses_explain_params() {
        let state = generated().await;
        let backend =
            ScriptedBackend::new([Ok("  Overview: prints one.\n```python\nprint(1)\n```\n".to_string())]);

        let outcome = explain(state, &backend, &settings()).await;

        assert_eq!(
            outcome.state.explanation.as_deref(),
            Some("Overview: prints one.\n```python\nprint(1)\n```")
        );
        let params = &backend.params()[0];
        assert_eq!(params.temperature, 0.3);
        assert_eq!(params.max_tokens, 1024);
    }

    #[tokio::test]
    async fn test_derived_actions_use_request_that_made_base_code() {
        let mut state = generated().await;
        state.selections.language = Language::Rust;
        state.selections.complexity = ComplexityTier::Expert;
        let backend = ScriptedBackend::new([Ok("Fine.".to_string())]);

        explain(state, &backend, &settings()).await;

        let prompt = &backend.prompts()[0];
        assert!(prompt.contains("Explain this Python code"));
        assert!(prompt.contains("Design Notes"));
    }

    #[tokio::test]
    async fn test_missing_configuration_declines_everything_but_clear() {
        let missing = Error::missing_api_key();
        let state = with_query("anything");

        let outcome = run(Action::Generate, state.clone(), Err(&missing), &settings()).await;
        assert_eq!(outcome.state, state);
        assert_eq!(outcome.notice, Some(Notice::Error(missing.to_string())));

        let populated = generated().await;
        let outcome = run(Action::Clear, populated, Err(&missing), &settings()).await;
        assert_eq!(outcome.notice, None);
        assert!(outcome.state.generated.is_none());
    }
}
