use crate::prelude::*;
use clap::Parser;

mod codegen;
mod completion;
mod error;
mod prelude;
mod web;

use completion::{
    DEFAULT_BACKUP_MODEL, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_PRIMARY_MODEL,
    DEFAULT_TOP_P,
};

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Generate, optimize, and explain code in multiple languages from a natural-language request"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Groq API key
    #[clap(long, env = "GROQ_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion API
    #[clap(long, env = "GROQ_BASE_URL", global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Model tried first for every request
    #[clap(long, env = "ASTRACODE_PRIMARY_MODEL", global = true, default_value = DEFAULT_PRIMARY_MODEL)]
    primary_model: String,

    /// Model tried once when the primary model fails to generate code
    #[clap(long, env = "ASTRACODE_BACKUP_MODEL", global = true, default_value = DEFAULT_BACKUP_MODEL)]
    backup_model: String,

    /// Maximum output tokens for code completions
    #[clap(long, env = "ASTRACODE_MAX_TOKENS", global = true, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Nucleus sampling parameter
    #[clap(long, env = "ASTRACODE_TOP_P", global = true, default_value_t = DEFAULT_TOP_P)]
    top_p: f32,

    /// Request timeout in seconds (defaults to the HTTP client's own)
    #[clap(long, env = "ASTRACODE_TIMEOUT", global = true)]
    timeout: Option<u64>,

    /// Whether to display additional information.
    #[clap(long, env = "ASTRACODE_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Generate code from a natural-language request
    Generate(crate::codegen::GenerateOptions),

    /// Serve the web UI
    Serve(crate::web::ServeOptions),

    /// List supported languages, complexity tiers, styles, and themes
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Generate(options) => crate::codegen::run(options, app.global).await,
        SubCommands::Serve(options) => crate::web::run(options, app.global).await,
        SubCommands::Languages => crate::codegen::list_options(),
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
