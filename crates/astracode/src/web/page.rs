use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::codegen::Notice;
use crate::error::Error;
use astracode_core::codegen::{
    Action, ComplexityTier, GenerationResult, Language, SessionState, Style,
};
use astracode_core::theme::Theme;

const HIGHLIGHT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/atom-one-dark.min.css";
const HIGHLIGHT_JS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js";

/// Render the whole page for one session.
///
/// Every piece of user or model text goes through `html_escape`.
pub fn render(state: &SessionState, notice: Option<&Notice>, config_error: Option<&Error>) -> String {
    let selections = &state.selections;

    let mut banners = String::new();
    if let Some(err) = config_error {
        banners.push_str(&format!(
            r#"<div class="notice error">{}</div>"#,
            text(&err.to_string())
        ));
    }
    if let Some(notice) = notice {
        let level = match notice {
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        };
        banners.push_str(&format!(
            r#"<div class="notice {level}">{}</div>"#,
            text(notice.message())
        ));
    }

    let language_options = options(
        Language::ALL.iter().map(Language::name),
        selections.language.name(),
    );
    let theme_options = options(Theme::ALL.iter().map(Theme::name), selections.theme.name());
    let complexity_options = options(
        ComplexityTier::ALL.iter().map(ComplexityTier::name),
        selections.complexity.name(),
    );
    let style_options = options(
        Style::ALL.iter().map(Style::name),
        selections.style.unwrap_or_default().name(),
    );

    let buttons: String = [
        (Action::Generate, "/generate", "🚀 Generate Code"),
        (Action::Alternative, "/alternative", "🔄 Alternative"),
        (Action::Optimize, "/optimize", "⚡ Optimize"),
        (Action::Explain, "/explain", "📝 Explain"),
        (Action::Clear, "/clear", "🧹 Clear"),
    ]
    .iter()
    .map(|(action, path, label)| {
        let blocked = *action != Action::Clear && config_error.is_some();
        let disabled = if blocked || !state.is_available(*action) {
            " disabled"
        } else {
            ""
        };
        format!(r#"<button type="submit" formaction="{path}"{disabled}>{label}</button>"#)
    })
    .collect();

    let results = results(state);
    let palette = selections.theme.palette();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AstraCode</title>
<link rel="stylesheet" href="{HIGHLIGHT_CSS}">
<style>
  body {{ margin: 0; font-family: system-ui, sans-serif; color: white;
         background: linear-gradient(135deg, {bg} 0%, #16213e 100%); min-height: 100vh; }}
  main {{ max-width: 960px; margin: 0 auto; padding: 2rem; }}
  h1, h2, h3 {{ color: {primary}; }}
  label {{ display: block; margin-top: 0.75rem; }}
  input, select, textarea {{ width: 100%; box-sizing: border-box; color: {primary};
         background: rgba(0,0,0,0.3); border: 1px solid {primary}; border-radius: 10px; padding: 0.5rem; }}
  .settings {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 0 1rem; }}
  .actions {{ display: flex; gap: 0.5rem; margin-top: 1rem; flex-wrap: wrap; }}
  button {{ background: rgba(79,255,176,0.2); border: 2px solid {primary}; color: {primary};
         border-radius: 10px; padding: 0.5rem 1rem; cursor: pointer; }}
  button:disabled {{ opacity: 0.4; cursor: not-allowed; }}
  .code-block {{ border: 2px solid {secondary}; border-radius: 15px; padding: 1rem;
         background: rgba(0,0,0,0.5); margin: 1rem 0; }}
  .code-block pre {{ margin: 0; overflow-x: auto; }}
  .explanation {{ white-space: pre-wrap; border: 1px solid {secondary}; border-radius: 10px;
         padding: 1rem; background: rgba(0,0,0,0.3); }}
  .notice {{ border-radius: 10px; padding: 0.75rem 1rem; margin: 1rem 0; }}
  .notice.warning {{ background: rgba(255,193,7,0.2); border: 1px solid #ffc107; }}
  .notice.error {{ background: rgba(255,82,82,0.2); border: 1px solid #ff5252; }}
  .model {{ opacity: 0.7; font-size: 0.85rem; }}
</style>
</head>
<body>
<main>
<h1>AstraCode</h1>
<p>Generate production-ready code in multiple languages with a single click</p>
{banners}
<form method="post" action="/generate">
  <label for="query">Describe your coding requirement:</label>
  <textarea id="query" name="query" rows="4" placeholder="e.g., A function to calculate Fibonacci sequence">{query}</textarea>
  <div class="settings">
    <label>Programming Language<select name="language">{language_options}</select></label>
    <label>Theme<select name="theme">{theme_options}</select></label>
    <label>Code Complexity<select name="complexity">{complexity_options}</select></label>
    <label>Style<select name="style">{style_options}</select></label>
  </div>
  <label for="keywords">Keywords (comma separated):</label>
  <input id="keywords" name="keywords" value="{keywords}">
  <div class="actions">{buttons}</div>
</form>
{results}
</main>
<script src="{HIGHLIGHT_JS}"></script>
<script>hljs.highlightAll();</script>
</body>
</html>
"#,
        bg = palette.background,
        primary = palette.primary,
        secondary = palette.secondary,
        query = text(&selections.query),
        keywords = attr(&selections.keywords.join(", ")),
    )
}

fn options<'a>(names: impl Iterator<Item = &'a str>, selected: &str) -> String {
    names
        .map(|name| {
            let marker = if name == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{marker}>{0}</option>"#, attr(name))
        })
        .collect()
}

fn results(state: &SessionState) -> String {
    let Some((request, generated)) = state.base() else {
        return String::new();
    };
    let language = request.language;

    let mut html = code_block(&format!("Generated {language} Code"), generated, language);
    if let Some(alternative) = &state.alternative {
        html.push_str(&code_block(
            &format!("Alternative {language} Solution"),
            alternative,
            language,
        ));
    }
    if let Some(optimized) = &state.optimized {
        html.push_str(&code_block(
            &format!("Optimized {language} Code"),
            optimized,
            language,
        ));
    }
    if let Some(explanation) = &state.explanation {
        html.push_str(&format!(
            r#"<h2>📝 Code Explanation</h2><div class="explanation">{}</div>"#,
            text(explanation)
        ));
    }
    html
}

fn code_block(title: &str, result: &GenerationResult, language: Language) -> String {
    format!(
        r#"<section class="code-block"><h2>{}</h2><p class="model">{}</p><pre><code class="language-{}">{}</code></pre></section>"#,
        text(title),
        text(&result.source_model),
        language.highlight_class(),
        text(&result.code)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use astracode_core::codegen::{GenerationRequest, Selections};

    fn generated(code: &str) -> SessionState {
        SessionState::default().with_generated(
            GenerationRequest::new("q", Language::Cpp),
            GenerationResult {
                code: code.to_string(),
                source_model: "primary".to_string(),
            },
        )
    }

    #[test]
    fn test_empty_state_disables_derived_buttons() {
        let html = render(&SessionState::default(), None, None);
        assert!(html.contains(r#"formaction="/generate">"#));
        assert!(html.contains(r#"formaction="/optimize" disabled>"#));
        assert!(html.contains(r#"formaction="/explain" disabled>"#));
        assert!(html.contains(r#"formaction="/alternative" disabled>"#));
        assert!(html.contains(r#"formaction="/clear">"#));
        assert!(!html.contains("<pre><code"));
    }

    #[test]
    fn test_generated_code_is_escaped_and_highlighted() {
        let html = render(&generated("int main() { return 1 < 2; }"), None, None);
        assert!(html.contains("Generated C++ Code"));
        assert!(html.contains(r#"<code class="language-cpp">int main() { return 1 &lt; 2; }</code>"#));
        assert!(html.contains(r#"formaction="/optimize">"#));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let state = SessionState::default().with_selections(Selections {
            query: "</textarea><script>alert(1)</script>".to_string(),
            keywords: vec!["\"quoted\"".to_string()],
            ..Selections::default()
        });
        let html = render(&state, None, None);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;/textarea&gt;"));
        assert!(html.contains("&quot;quoted&quot;"));
    }

    #[test]
    fn test_selected_options_follow_state() {
        let state = SessionState::default().with_selections(Selections {
            language: Language::Rust,
            theme: Theme::Dracula,
            complexity: ComplexityTier::Expert,
            style: Some(Style::Functional),
            ..Selections::default()
        });
        let html = render(&state, None, None);
        assert!(html.contains(r#"<option value="Rust" selected>"#));
        assert!(html.contains(r#"<option value="Expert" selected>"#));
        assert!(html.contains(r#"<option value="Functional" selected>"#));
        assert!(html.contains(Theme::Dracula.palette().primary));
    }

    #[test]
    fn test_config_error_disables_everything_but_clear() {
        let err = Error::missing_api_key();
        let html = render(&generated("x"), None, Some(&err));
        assert!(html.contains("GROQ_API_KEY not found"));
        assert!(html.contains(r#"formaction="/generate" disabled>"#));
        assert!(html.contains(r#"formaction="/optimize" disabled>"#));
        assert!(html.contains(r#"formaction="/clear">"#));
    }

    #[test]
    fn test_notice_and_explanation_rendered() {
        let state = generated("x").with_explanation("Overview: <b>does x</b>".to_string());
        let notice = Notice::Warning("careful".to_string());
        let html = render(&state, Some(&notice), None);
        assert!(html.contains(r#"<div class="notice warning">careful</div>"#));
        assert!(html.contains("Overview: &lt;b&gt;does x&lt;/b&gt;"));
    }
}
