#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Please describe your coding requirement before generating")]
    EmptyInput,

    #[error("{0} is unavailable until code has been generated")]
    ActionUnavailable(String),
}

impl Error {
    pub fn missing_api_key() -> Self {
        Error::Configuration(
            "GROQ_API_KEY not found! Set it in the environment or pass --api-key.".to_string(),
        )
    }

    /// Whether the user can fix this by changing their input rather than the setup.
    pub fn is_warning(&self) -> bool {
        matches!(self, Error::EmptyInput | Error::ActionUnavailable(_))
    }
}
