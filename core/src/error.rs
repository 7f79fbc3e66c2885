//! Error taxonomy shared by every generation entry point.

use thiserror::Error;

/// Failures surfaced by the breeding and level generation systems.
///
/// Generation is atomic: an error means no partial record was produced.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ContentError {
    /// The caller supplied missing or malformed input. Never worth retrying.
    #[error("{0}")]
    Validation(String),
    /// The calling session could not be verified.
    #[error("Unauthorized")]
    Unauthorized,
    /// Generation failed for an internal reason, e.g. an empty catalog.
    /// Callers may retry with different inputs or a fresh seed.
    #[error("generation failed: {0}")]
    Generation(String),
}

impl ContentError {
    /// Builds a validation error from any displayable message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Builds a generation error from any displayable message.
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }
}
