use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type StartupMovieResult<T> = Result<T, StartupMovieError>;

/// Top-level error taxonomy for slot rotation and its collaborators.
#[derive(thiserror::Error, Debug)]
pub enum StartupMovieError {
    /// Invalid level identifier or layout value.
    #[error("validation error: {0}")]
    Validation(String),

    /// A layout configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The persisted state file could not be opened for writing on first run.
    ///
    /// Nothing on disk was touched when this is returned.
    #[error("state file '{}' is not writable: {source}", .path.display())]
    StateNotWritable {
        /// Path of the sidecar state file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading or writing the persisted state file failed.
    #[error("state error: {op} '{}': {source}", .path.display())]
    State {
        /// Short label of the failing operation.
        op: &'static str,
        /// Path of the sidecar state file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A mutating rotation step failed; later steps were not attempted.
    #[error(
        "rotation error: step {step} ({action}) failed after {applied} applied step(s): {source}"
    )]
    Rotation {
        /// 1-based index of the failing step within its plan.
        step: usize,
        /// Number of steps that completed before the failure.
        applied: usize,
        /// Human-readable description of the failing step.
        action: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StartupMovieError {
    /// Build a [`StartupMovieError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StartupMovieError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StartupMovieError::State`] value.
    pub fn state(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::State {
            op,
            path: path.into(),
            source,
        }
    }

    /// Number of rotation steps already applied when this error was raised.
    ///
    /// Zero for every error that is not a [`StartupMovieError::Rotation`].
    pub fn applied_steps(&self) -> usize {
        match self {
            Self::Rotation { applied, .. } => *applied,
            _ => 0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
