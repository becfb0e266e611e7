use async_trait::async_trait;
use regex::Regex;
use std::process::{Output, Stdio};
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use crate::config::ToolConfig;
use crate::data::GenerationTool;
use crate::error::GenerationError;

const INSTALL_HINT: &str = "Install it with: npm install -g @anthropic-ai/claude-code";

/// Runs the Claude Code CLI (or any command with the same contract) as a
/// child process: `<program> [args..] -p <prompt> --output-format json`.
#[derive(Debug, Clone)]
pub struct ClaudeCli {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ClaudeCli {
    pub fn new(config: &ToolConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            timeout: config.timeout(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Spawns `cmd` and waits for it, bounded by the configured timeout
    async fn run(&self, mut cmd: Command) -> Result<Output, GenerationError> {
        let child = cmd.spawn().map_err(|e| {
            GenerationError::ExternalToolFailure(format!(
                "Failed to spawn {}: {}",
                self.program, e
            ))
        })?;

        let waited = match self.timeout {
            // Dropping the unfinished future drops the child, which kills it
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| GenerationError::Timeout(limit))?,
            None => child.wait_with_output().await,
        };

        waited.map_err(|e| {
            GenerationError::ExternalToolFailure(format!(
                "Failed to read output of {}: {}",
                self.program, e
            ))
        })
    }
}

#[async_trait]
impl GenerationTool for ClaudeCli {
    async fn probe(&self) -> Result<String, GenerationError> {
        let mut cmd = self.command();
        cmd.arg("--version");

        let output = self.run(cmd).await.map_err(|e| {
            GenerationError::ToolNotInstalled(format!("{} ({}). {}", self.program, e, INSTALL_HINT))
        })?;

        if !output.status.success() {
            return Err(GenerationError::ToolNotInstalled(format!(
                "{} --version exited with {}. {}",
                self.program, output.status, INSTALL_HINT
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    async fn invoke(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut cmd = self.command();
        cmd.arg("-p")
            .arg(escape_prompt(prompt))
            .arg("--output-format")
            .arg("json");

        debug!("Executing {} ({} byte prompt)", self.program, prompt.len());
        let output = self.run(cmd).await?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", self.program, stderr.trim());
        }

        if !output.status.success() {
            return Err(GenerationError::ExternalToolFailure(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Escapes double quotes and `$` so a shell would pass the prompt through
/// unchanged.
pub fn escape_prompt(prompt: &str) -> String {
    shell_sigil_re().replace_all(prompt, r"\$0").into_owned()
}

fn shell_sigil_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"["$]"#).expect("valid regex"))
}
