use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The module's required input is missing from the profile. Does not fail
    /// sibling modules; the unified report absorbs it by degrading confidence.
    #[error("insufficient data for analysis: {reason}")]
    InsufficientData { reason: String },

    /// No analyzable text content anywhere on the profile.
    #[error("profile has no analyzable text content")]
    EmptyCorpus,
}
