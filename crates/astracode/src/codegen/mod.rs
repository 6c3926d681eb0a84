use crate::prelude::{eprintln, println, *};
use astracode_core::codegen::types::parse_keywords;
use astracode_core::codegen::{
    build_prompt, Action, ComplexityTier, Language, Selections, SessionState, Style,
};
use astracode_core::theme::Theme;
use prettytable::row;

use crate::completion::{CompletionBackend, GroqBackend, Settings};

pub mod actions;

pub use actions::{ActionOutcome, Notice};

#[derive(Debug, clap::Args)]
pub struct GenerateOptions {
    /// Describe your coding requirement
    pub query: String,

    /// Programming language of the generated code
    #[arg(short, long, default_value = "Python")]
    pub language: Language,

    /// Code complexity (Basic, Medium, Advanced, Expert); unknown values use Medium
    #[arg(short, long, default_value = "Medium")]
    pub complexity: String,

    /// Comma separated keywords to incorporate
    #[arg(short, long, default_value = "")]
    pub keywords: String,

    /// Coding style hint
    #[arg(short, long)]
    pub style: Option<Style>,

    /// Also generate an alternative solution
    #[arg(long)]
    pub alternative: bool,

    /// Also generate an optimized version
    #[arg(long)]
    pub optimize: bool,

    /// Also explain the generated code
    #[arg(long)]
    pub explain: bool,

    /// Print the prompt instead of calling the completion API
    #[arg(long)]
    pub dry_run: bool,

    /// Output the final session state as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateOptions {
    fn selections(&self) -> Selections {
        Selections {
            query: self.query.clone(),
            language: self.language,
            theme: Theme::default(),
            complexity: ComplexityTier::parse_or_default(&self.complexity),
            keywords: parse_keywords(&self.keywords),
            style: self.style,
        }
    }

    /// Actions to run in order, starting with base generation.
    fn actions(&self) -> Vec<Action> {
        let mut actions = vec![Action::Generate];
        if self.alternative {
            actions.push(Action::Alternative);
        }
        if self.optimize {
            actions.push(Action::Optimize);
        }
        if self.explain {
            actions.push(Action::Explain);
        }
        actions
    }
}

pub async fn run(options: GenerateOptions, global: crate::Global) -> Result<()> {
    let selections = options.selections();

    if options.dry_run {
        println!("{}", build_prompt(&selections.request()));
        return Ok(());
    }

    let backend = GroqBackend::from_global(&global).map_err(|e| eyre!(e))?;
    let settings = Settings::from_global(&global);

    if global.verbose {
        eprintln!("API Base: {}", global.base_url);
        eprintln!(
            "Models: {} (backup: {})",
            settings.primary_model, settings.backup_model
        );
        eprintln!(
            "Language: {}, Complexity: {}",
            selections.language, selections.complexity
        );
        eprintln!();
    }

    let (state, failure) = run_actions(
        SessionState::default().with_selections(selections),
        &options.actions(),
        &backend,
        &settings,
    )
    .await;

    // Whatever finished before a failure is still shown.
    if options.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print_state(&state, global.verbose);
    }

    match failure {
        Some((action, notice)) => Err(eyre!("{action}: {}", notice.message())),
        None => Ok(()),
    }
}

/// Run `steps` in order, stopping at the first one that reports a notice.
///
/// Returns the state reached so far and the step that failed, if any.
async fn run_actions(
    mut state: SessionState,
    steps: &[Action],
    backend: &dyn CompletionBackend,
    settings: &Settings,
) -> (SessionState, Option<(Action, Notice)>) {
    for action in steps {
        let outcome = actions::run(*action, state, Ok(backend), settings).await;
        state = outcome.state;
        if let Some(notice) = outcome.notice {
            return (state, Some((*action, notice)));
        }
    }
    (state, None)
}

fn print_state(state: &SessionState, verbose: bool) {
    let Some((request, generated)) = state.base() else {
        return;
    };
    let only_generated =
        state.alternative.is_none() && state.optimized.is_none() && state.explanation.is_none();

    if only_generated && !verbose {
        println!("{}", generated.code);
        return;
    }

    let sections = [
        ("Generated", Some(generated)),
        ("Alternative", state.alternative.as_ref()),
        ("Optimized", state.optimized.as_ref()),
    ];
    for (label, result) in sections {
        if let Some(result) = result {
            println!("// {label} {} code ({})", request.language, result.source_model);
            println!("{}", result.code);
            println!();
        }
    }

    if let Some(explanation) = &state.explanation {
        println!("// Explanation");
        println!("{explanation}");
    }
}

/// Print the supported languages, complexity tiers, styles, and themes.
pub fn list_options() -> Result<()> {
    let mut table = new_table();
    table.add_row(row!["LANGUAGE", "FENCE TAGS"]);
    for language in Language::ALL {
        table.add_row(row![language.name(), language.fence_tags().join(", ")]);
    }
    table.printstd();
    println!();

    let mut table = new_table();
    table.add_row(row!["COMPLEXITY", "TEMPERATURE", "DESCRIPTION"]);
    for tier in ComplexityTier::ALL {
        let profile = tier.profile();
        table.add_row(row![tier.name(), profile.temperature, profile.description]);
    }
    table.printstd();
    println!();

    println!("Styles: {}", Style::names().join(", "));
    println!("Themes: {}", Theme::names().join(", "));

    Ok(())
}
