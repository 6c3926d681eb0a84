mod groq;

pub use groq::GroqBackend;

use crate::prelude::*;
use astracode_core::codegen::completion::{EXPLAIN_MAX_TOKENS, EXPLAIN_TEMPERATURE};
use astracode_core::codegen::{ComplexityTier, RetryPolicy, SamplingParams};
use async_trait::async_trait;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_PRIMARY_MODEL: &str = "qwen-2.5-coder-32b";
pub const DEFAULT_BACKUP_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TOP_P: f32 = 0.95;

/// A text completion service.
///
/// Failures are reported as [`Error::Generation`] with a description of the
/// underlying transport or service error.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        params: &SamplingParams,
    ) -> Result<String, Error>;
}

/// Model selection and sampling configuration shared by every action.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub primary_model: String,
    pub backup_model: String,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            backup_model: DEFAULT_BACKUP_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
        }
    }
}

impl Settings {
    pub fn from_global(global: &crate::Global) -> Self {
        Self {
            primary_model: global.primary_model.clone(),
            backup_model: global.backup_model.clone(),
            max_tokens: global.max_tokens,
            top_p: global.top_p,
        }
    }

    /// Primary then backup. Used for base code generation only.
    pub fn generation_policy(&self) -> RetryPolicy {
        RetryPolicy::with_fallback(&self.primary_model, &self.backup_model)
    }

    /// Primary model only. Used for alternative, optimize, and explain.
    pub fn derived_policy(&self) -> RetryPolicy {
        RetryPolicy::single(&self.primary_model)
    }

    pub fn code_params(&self, tier: ComplexityTier) -> SamplingParams {
        SamplingParams {
            temperature: tier.profile().temperature,
            max_tokens: self.max_tokens,
            top_p: self.top_p,
        }
    }

    pub fn explain_params(&self) -> SamplingParams {
        SamplingParams {
            temperature: EXPLAIN_TEMPERATURE,
            max_tokens: EXPLAIN_MAX_TOKENS,
            top_p: self.top_p,
        }
    }
}

/// Run `prompt` through each model of `policy` until one produces text that
/// `accept` turns into a value.
///
/// Returns the accepted value and the model that produced it, or the last
/// failure once every model has been tried.
pub async fn complete_with_policy<T, F>(
    backend: &dyn CompletionBackend,
    policy: &RetryPolicy,
    prompt: &str,
    params: &SamplingParams,
    mut accept: F,
) -> Result<(T, String), Error>
where
    T: Send,
    F: FnMut(String) -> Result<T, Error> + Send,
{
    let mut last_error = None;

    for (attempt, model) in policy.attempts().enumerate() {
        log::debug!(
            "Completion attempt {}/{} with {model} (temperature={}, max_tokens={}, top_p={})",
            attempt + 1,
            policy.max_attempts(),
            params.temperature,
            params.max_tokens,
            params.top_p
        );

        let outcome = match backend.complete(prompt, model, params).await {
            Ok(text) => accept(text),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(value) => return Ok((value, model.to_string())),
            Err(err) => {
                if attempt + 1 < policy.max_attempts() {
                    log::warn!("{model} failed ({err}), trying the next model");
                } else {
                    log::error!("{model} failed ({err}), no models left");
                }
                last_error = Some(err);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| Error::Generation("No models configured".to_string())))
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend that replays canned responses and records each call.
    #[derive(Default)]
    pub struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<String, Error>>>,
        calls: Mutex<Vec<(String, String, SamplingParams)>>,
    }

    impl ScriptedBackend {
        pub fn new<I>(responses: I) -> Self
        where
            I: IntoIterator<Item = Result<String, Error>>,
        {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Models called so far, in order.
        pub fn models(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, model, _)| model.clone())
                .collect()
        }

        pub fn prompts(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(prompt, _, _)| prompt.clone())
                .collect()
        }

        pub fn params(&self) -> Vec<SamplingParams> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, _, params)| params.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CompletionBackend for ScriptedBackend {
        async fn complete(
            &self,
            prompt: &str,
            model: &str,
            params: &SamplingParams,
        ) -> Result<String, Error> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), model.to_string(), params.clone()));
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(Error::Generation("script exhausted".to_string())))
        }
    }

    pub fn fail(message: &str) -> Result<String, Error> {
        Err(Error::Generation(message.to_string()))
    }
}
