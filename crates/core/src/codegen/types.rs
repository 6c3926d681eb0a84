use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when a user-supplied name does not match any known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'. Expected one of: {expected}")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

impl ParseError {
    fn new(kind: &'static str, value: &str, names: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: names.join(", "),
        }
    }
}

/// Target programming language for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    Python,
    JavaScript,
    Java,
    #[serde(rename = "C++")]
    Cpp,
    Go,
    Rust,
    TypeScript,
    Swift,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::Python,
        Language::JavaScript,
        Language::Java,
        Language::Cpp,
        Language::Go,
        Language::Rust,
        Language::TypeScript,
        Language::Swift,
    ];

    /// Literal language name as shown to users and interpolated into prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::TypeScript => "TypeScript",
            Language::Swift => "Swift",
        }
    }

    /// Info-string tags a model may put after an opening fence for this language.
    ///
    /// The lowercase language name always comes first.
    pub fn fence_tags(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &["python", "py", "python3"],
            Language::JavaScript => &["javascript", "js", "jsx"],
            Language::Java => &["java"],
            Language::Cpp => &["c++", "cpp", "cxx", "cc"],
            Language::Go => &["go", "golang"],
            Language::Rust => &["rust", "rs"],
            Language::TypeScript => &["typescript", "ts", "tsx"],
            Language::Swift => &["swift"],
        }
    }

    /// Class name understood by highlight.js.
    pub fn highlight_class(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::TypeScript => "typescript",
            Language::Swift => "swift",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Language::name).collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ParseError;

    /// Accepts the display name or any fence tag, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| {
                lang.name().to_lowercase() == needle || lang.fence_tags().contains(&needle.as_str())
            })
            .ok_or_else(|| ParseError::new("language", s, &Self::names()))
    }
}

/// Complexity preset controlling prompt phrasing and sampling temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ComplexityTier {
    Basic,
    #[default]
    Medium,
    Advanced,
    Expert,
}

/// Static description and temperature for a complexity tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplexityProfile {
    pub description: &'static str,
    pub temperature: f32,
}

impl ComplexityTier {
    pub const ALL: [ComplexityTier; 4] = [
        ComplexityTier::Basic,
        ComplexityTier::Medium,
        ComplexityTier::Advanced,
        ComplexityTier::Expert,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ComplexityTier::Basic => "Basic",
            ComplexityTier::Medium => "Medium",
            ComplexityTier::Advanced => "Advanced",
            ComplexityTier::Expert => "Expert",
        }
    }

    pub fn profile(&self) -> ComplexityProfile {
        match self {
            ComplexityTier::Basic => ComplexityProfile {
                description: "Generate simple code for",
                temperature: 0.5,
            },
            ComplexityTier::Medium => ComplexityProfile {
                description: "Generate well-structured code with comments for",
                temperature: 0.5,
            },
            ComplexityTier::Advanced => ComplexityProfile {
                description: "Generate production-ready code with error handling, tests, and documentation for",
                temperature: 0.7,
            },
            ComplexityTier::Expert => ComplexityProfile {
                description: "Generate expert-level, highly optimized production code with comprehensive error handling, extensive tests, and thorough documentation for",
                temperature: 0.7,
            },
        }
    }

    /// Parse a tier name, falling back to `Medium` for anything unrecognized.
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(ComplexityTier::name).collect()
    }
}

impl fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ComplexityTier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseError::new("complexity tier", s, &Self::names()))
    }
}

/// Optional coding style hint. `Default` means no style clause is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Style {
    #[default]
    Default,
    Functional,
    ObjectOriented,
    Procedural,
    Concise,
    Documented,
}

impl Style {
    pub const ALL: [Style; 6] = [
        Style::Default,
        Style::Functional,
        Style::ObjectOriented,
        Style::Procedural,
        Style::Concise,
        Style::Documented,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Style::Default => "Default",
            Style::Functional => "Functional",
            Style::ObjectOriented => "Object-Oriented",
            Style::Procedural => "Procedural",
            Style::Concise => "Concise",
            Style::Documented => "Documented",
        }
    }

    /// Phrase used inside the prompt's style clause.
    pub fn directive(&self) -> Option<&'static str> {
        match self {
            Style::Default => None,
            Style::Functional => Some("a functional programming style"),
            Style::ObjectOriented => Some("an object-oriented style"),
            Style::Procedural => Some("a procedural style"),
            Style::Concise => Some("a concise, minimal style"),
            Style::Documented => Some("a heavily documented style"),
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(Style::name).collect()
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Style {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| {
                style
                    .name()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_lowercase()
                    == needle
            })
            .ok_or_else(|| ParseError::new("style", s, &Self::names()))
    }
}

/// A single code generation request, built fresh for every action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub query: String,
    pub language: Language,
    pub complexity: ComplexityTier,
    pub keywords: Vec<String>,
    pub style: Option<Style>,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>, language: Language) -> Self {
        Self {
            query: query.into(),
            language,
            complexity: ComplexityTier::default(),
            keywords: Vec::new(),
            style: None,
        }
    }

    pub fn with_complexity(mut self, complexity: ComplexityTier) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style(mut self, style: Option<Style>) -> Self {
        self.style = style;
        self
    }

    /// Whether the query holds anything besides whitespace.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Code produced by a completion call, tagged with the model that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub code: String,
    pub source_model: String,
}

/// Split a comma separated tag list into trimmed, non-empty keywords.
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parses_display_name_and_tags() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("c++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("cpp".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("TS".parse::<Language>().unwrap(), Language::TypeScript);
        assert!("cobol".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_fence_tags_start_with_lowercase_name() {
        for lang in Language::ALL {
            assert_eq!(lang.fence_tags()[0], lang.name().to_lowercase());
        }
    }

    #[test]
    fn test_complexity_parse_or_default_falls_back_to_medium() {
        assert_eq!(ComplexityTier::parse_or_default("expert"), ComplexityTier::Expert);
        assert_eq!(ComplexityTier::parse_or_default("Insane"), ComplexityTier::Medium);
        assert_eq!(ComplexityTier::parse_or_default(""), ComplexityTier::Medium);
    }

    #[test]
    fn test_complexity_profiles_have_distinct_descriptions() {
        let descriptions: std::collections::HashSet<_> = ComplexityTier::ALL
            .iter()
            .map(|t| t.profile().description)
            .collect();
        assert_eq!(descriptions.len(), ComplexityTier::ALL.len());
        assert_eq!(ComplexityTier::Advanced.profile().temperature, 0.7);
        assert_eq!(ComplexityTier::Basic.profile().temperature, 0.5);
    }

    #[test]
    fn test_style_parse_ignores_punctuation() {
        assert_eq!("object-oriented".parse::<Style>().unwrap(), Style::ObjectOriented);
        assert_eq!("ObjectOriented".parse::<Style>().unwrap(), Style::ObjectOriented);
        assert_eq!("default".parse::<Style>().unwrap(), Style::Default);
        assert!(Style::Default.directive().is_none());
        assert!("baroque".parse::<Style>().is_err());
    }

    #[test]
    fn test_parse_keywords_drops_blanks() {
        assert_eq!(
            parse_keywords(" sort, ,recursion ,"),
            vec!["sort".to_string(), "recursion".to_string()]
        );
        assert!(parse_keywords("").is_empty());
    }

    #[test]
    fn test_has_query() {
        assert!(!GenerationRequest::new("   \n", Language::Go).has_query());
        assert!(GenerationRequest::new("fizzbuzz", Language::Go).has_query());
    }
}
