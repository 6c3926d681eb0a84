use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{
    parse_keywords, ComplexityTier, GenerationRequest, GenerationResult, Language, Style,
};
use crate::theme::Theme;

/// User actions that change the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Generate,
    Alternative,
    Optimize,
    Explain,
    Clear,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Generate => "Generate",
            Action::Alternative => "Alternative",
            Action::Optimize => "Optimize",
            Action::Explain => "Explain",
            Action::Clear => "Clear",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Current form values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selections {
    pub query: String,
    pub language: Language,
    pub theme: Theme,
    pub complexity: ComplexityTier,
    pub keywords: Vec<String>,
    pub style: Option<Style>,
}

impl Selections {
    /// Build selections from raw form strings. Unknown values fall back to
    /// their defaults; an unknown complexity becomes `Medium`.
    pub fn from_form(
        query: &str,
        language: &str,
        theme: &str,
        complexity: &str,
        keywords: &str,
        style: &str,
    ) -> Self {
        Self {
            query: query.to_string(),
            language: language.parse().unwrap_or_default(),
            theme: theme.parse().unwrap_or_default(),
            complexity: ComplexityTier::parse_or_default(complexity),
            keywords: parse_keywords(keywords),
            style: style.parse().ok(),
        }
    }

    pub fn request(&self) -> GenerationRequest {
        GenerationRequest {
            query: self.query.clone(),
            language: self.language,
            complexity: self.complexity,
            keywords: self.keywords.clone(),
            style: self.style,
        }
    }
}

/// Per-session UI state: the form selections plus four result slots.
///
/// Every transition consumes the state and returns the next one. Nothing here
/// performs I/O.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub selections: Selections,
    /// Request that produced `generated`. Derived actions read from it so a
    /// later change of the form does not relabel existing code.
    pub base_request: Option<GenerationRequest>,
    pub generated: Option<GenerationResult>,
    pub alternative: Option<GenerationResult>,
    pub optimized: Option<GenerationResult>,
    pub explanation: Option<String>,
}

impl SessionState {
    pub fn with_selections(self, selections: Selections) -> Self {
        Self { selections, ..self }
    }

    /// Store fresh base code and drop every slot derived from the old one.
    pub fn with_generated(self, request: GenerationRequest, result: GenerationResult) -> Self {
        Self {
            base_request: Some(request),
            generated: Some(result),
            alternative: None,
            optimized: None,
            explanation: None,
            ..self
        }
    }

    pub fn with_alternative(self, result: GenerationResult) -> Self {
        Self {
            alternative: Some(result),
            ..self
        }
    }

    pub fn with_optimized(self, result: GenerationResult) -> Self {
        Self {
            optimized: Some(result),
            ..self
        }
    }

    pub fn with_explanation(self, explanation: String) -> Self {
        Self {
            explanation: Some(explanation),
            ..self
        }
    }

    /// Empty all four slots, keeping the form selections.
    pub fn cleared(self) -> Self {
        Self {
            selections: self.selections,
            ..Self::default()
        }
    }

    /// Base code and the request it came from, when both exist.
    pub fn base(&self) -> Option<(&GenerationRequest, &GenerationResult)> {
        self.base_request.as_ref().zip(self.generated.as_ref())
    }

    pub fn is_available(&self, action: Action) -> bool {
        match action {
            Action::Generate | Action::Clear => true,
            Action::Alternative | Action::Optimize | Action::Explain => self.base().is_some(),
        }
    }
}
