use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Everything that can stop the launcher before control reaches the runtime.
///
/// Failures that happen inside the runtime (missing module, bad arguments,
/// exceptions) are not represented here: they come back as an exit code.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("argument vector is empty, expected at least the program name")]
    MissingProgramName,

    #[error("cannot allocate the rewritten argument vector: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("no Python runtime found (searched: {searched})")]
    RuntimeNotFound { searched: String },

    #[error("argument {index} contains an interior NUL and cannot be passed to the runtime")]
    InvalidArgument { index: usize },

    #[error("{0} arguments do not fit in the runtime's argument count")]
    TooManyArguments(usize),

    #[error("failed to run the interpreter: {0}")]
    Spawn(#[from] io::Error),
}

impl LaunchError {
    /// Whether the process has to abort instead of reporting the error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LaunchError::Allocation(_))
    }
}
