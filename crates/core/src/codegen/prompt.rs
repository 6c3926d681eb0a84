use super::types::{ComplexityTier, GenerationRequest, Language};

/// Directive appended after the request line of every code prompt.
pub const BEST_PRACTICES_DIRECTIVE: &str =
    "Follow idiomatic best practices for the language and include comments in the code itself.";

/// Final line of every code prompt.
pub const RAW_CODE_DIRECTIVE: &str = "IMPORTANT: Return ONLY the raw executable code with comments, without any additional explanation before or after the code block.";

const EXPERT_DIRECTIVE: &str = "\
Additionally:
- Include performance benchmarks for the critical paths.
- Include a comprehensive unit test suite covering edge cases.
- Document the design trade-offs and alternatives considered in comments.";

const ALTERNATIVE_PREFIX: &str = "Alternative approach for: ";

/// Build the prompt for a code generation request.
///
/// The user's query is interpolated verbatim. Fragments are joined one per
/// line and the raw-code directive is always the last line.
pub fn build_prompt(request: &GenerationRequest) -> String {
    let profile = request.complexity.profile();
    let mut parts = vec![
        format!(
            "{} {} in {}.",
            profile.description, request.query, request.language
        ),
        BEST_PRACTICES_DIRECTIVE.to_string(),
    ];

    let keywords: Vec<&str> = request
        .keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .collect();
    if !keywords.is_empty() {
        parts.push(format!(
            "Incorporate these keywords: {}.",
            keywords.join(", ")
        ));
    }

    if let Some(directive) = request.style.and_then(|s| s.directive()) {
        parts.push(format!("Write the code in {directive}."));
    }

    if request.complexity == ComplexityTier::Expert {
        parts.push(EXPERT_DIRECTIVE.to_string());
    }

    parts.push(RAW_CODE_DIRECTIVE.to_string());
    parts.join("\n")
}

/// Build the prompt asking for a different approach to the same request.
pub fn build_alternative_prompt(request: &GenerationRequest) -> String {
    let alternative = GenerationRequest {
        query: format!("{ALTERNATIVE_PREFIX}{}", request.query),
        ..request.clone()
    };
    build_prompt(&alternative)
}

/// Build the prompt asking for an optimized rewrite of existing code.
pub fn build_optimize_prompt(code: &str, language: Language, tier: ComplexityTier) -> String {
    let mut parts = vec![
        format!("Optimize the following {language} code for performance and readability."),
        "Keep the observable behavior identical. Add comments that explain each optimization you make.".to_string(),
    ];
    if tier == ComplexityTier::Expert {
        parts.push(
            "Note the time and space complexity before and after each optimization.".to_string(),
        );
    }
    parts.push(format!("```{}\n{}\n```", language.fence_tags()[0], code));
    parts.push(RAW_CODE_DIRECTIVE.to_string());
    parts.join("\n\n")
}

/// Build the prompt asking for a structured explanation of existing code.
pub fn build_explain_prompt(code: &str, language: Language, tier: ComplexityTier) -> String {
    format!(
        "Explain this {language} code in simple terms using the following sections:\n\
         1. Overview: what the code does in one or two sentences.\n\
         2. Key Components: the main functions, types, and data structures.\n\
         3. Execution Flow: how control and data move through the code.\n\
         4. {}\n\n\
         ```{}\n{}\n```",
        tier_considerations(tier),
        language.fence_tags()[0],
        code
    )
}

fn tier_considerations(tier: ComplexityTier) -> &'static str {
    match tier {
        ComplexityTier::Basic => {
            "Learning Notes: concepts a beginner should understand to follow this code."
        }
        ComplexityTier::Medium => {
            "Design Notes: why the code is structured this way and how it could be extended."
        }
        ComplexityTier::Advanced => {
            "Production Notes: error handling, testing strategy, and failure modes."
        }
        ComplexityTier::Expert => {
            "Expert Notes: algorithmic complexity, performance characteristics, and design trade-offs."
        }
    }
}
