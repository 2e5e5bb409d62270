use thiserror::Error;

/// Failures that abort a whole image analysis. Resolution-stage problems are
/// deliberately absent: a food that cannot be resolved degrades the result
/// instead of failing it (see `food::api::LookupError`).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("image encoding produced no data")]
    EncodingFailed,

    #[error("request error: {0}")]
    NetworkError(String),

    #[error("failed to parse response: {0}")]
    InvalidResponse(String),

    #[error("no foods recognized in the image")]
    EmptyResult,
}

impl AnalysisError {
    /// Inline message shown to the user, matching the tone of the rest of
    /// the CLI output. Analysis failures are state, not crashes.
    pub fn user_message(&self) -> String {
        format!("❌ {}", self)
    }
}
