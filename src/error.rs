use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Failure conditions of the generation pipeline.
///
/// Malformed tool output has no variant: the result parser always falls back
/// to treating the raw text as test code.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    /// Bad path or arguments, detected before any tool invocation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The version probe could not reach the generation tool
    #[error("Generation tool is not available: {0}")]
    ToolNotInstalled(String),

    /// The tool could not be spawned or exited with a non-zero status
    #[error("Generation tool failed: {0}")]
    ExternalToolFailure(String),

    #[error("Generation tool timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Failed to {action} {}: {source}", .path.display())]
    FileIo {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerationError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerationError::FileIo {
            action: "read",
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenerationError::FileIo {
            action: "write",
            path: path.into(),
            source,
        }
    }
}
