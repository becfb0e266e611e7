use async_trait::async_trait;

use crate::error::GenerationError;

/// Capability interface for the external code-generation backend.
///
/// The orchestrator only ever talks to this trait, so the real CLI can be
/// swapped for a different backend or a scripted double in tests.
#[async_trait]
pub trait GenerationTool: Send + Sync {
    /// Checks that the tool is reachable and returns its version string.
    ///
    /// # Errors
    /// * `GenerationError::ToolNotInstalled` - The tool is missing or broken
    async fn probe(&self) -> Result<String, GenerationError>;

    /// Sends a prompt to the tool and returns its raw standard output.
    ///
    /// Blocks the calling task until the tool has finished.
    ///
    /// # Errors
    /// * `GenerationError::ExternalToolFailure` - Spawn failure or non-zero exit
    /// * `GenerationError::Timeout` - The configured wait bound was exceeded
    async fn invoke(&self, prompt: &str) -> Result<String, GenerationError>;
}
