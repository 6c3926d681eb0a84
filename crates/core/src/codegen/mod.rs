pub mod completion;
pub mod extract;
pub mod prompt;
pub mod retry;
pub mod session;
pub mod types;

pub use completion::{build_chat_request, first_choice_text, SamplingParams};
pub use extract::{extract_code, scan_fences, ExtractError, FenceScan};
pub use prompt::{build_alternative_prompt, build_explain_prompt, build_optimize_prompt, build_prompt};
pub use retry::RetryPolicy;
pub use session::{Action, Selections, SessionState};
pub use types::{
    ComplexityProfile, ComplexityTier, GenerationRequest, GenerationResult, Language, ParseError,
    Style,
};
