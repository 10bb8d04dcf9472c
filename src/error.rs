//! Error taxonomy shared by every generation step.

use thiserror::Error;

/// Errors that can occur while generating noise, displacement or projections.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// A normalization step saw a field with zero dynamic range.
    #[error("Degenerate input in {context}: field is constant (min == max == {value})")]
    DegenerateInput { context: String, value: f32 },

    /// A projection tag that this crate does not know about.
    #[error("Unsupported projection type: '{0}'")]
    UnsupportedProjection(String),

    /// An operation was invoked before the step it depends on.
    #[error("Missing prerequisite: '{operation}' requires '{requires}'")]
    MissingPrerequisite {
        operation: &'static str,
        requires: &'static str,
    },

    /// A tunable is outside its documented domain.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The sweep was cancelled before this instance started.
    #[error("Generation of '{0}' was cancelled")]
    Cancelled(String),

    /// A sweep configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TerrainError {
    /// Creates an `InvalidParameter` error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a `DegenerateInput` error.
    pub fn degenerate(context: impl Into<String>, value: f32) -> Self {
        Self::DegenerateInput {
            context: context.into(),
            value,
        }
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for TerrainError {
    fn from(err: std::io::Error) -> Self {
        Self::Config(err.to_string())
    }
}
