//! Generator configuration, read from `testgen.yml` and overridden by CLI flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::contexts::{DEFAULT_PATTERN, default_excludes};
use crate::error::GenerationError;

/// File looked up in the working directory when no path is given
pub const CONFIG_FILE: &str = "testgen.yml";

/// How to launch the external generation tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable name or path
    pub program: String,
    /// Arguments placed before the generated ones
    pub args: Vec<String>,
    /// Upper bound on a single invocation, unbounded when absent
    pub timeout_secs: Option<u64>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "claude".to_string(),
            args: Vec::new(),
            timeout_secs: None,
        }
    }
}

impl ToolConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub framework: String,
    /// Inclusion glob for batch discovery
    pub pattern: String,
    /// Exclusion globs for batch discovery
    pub exclude: Vec<String>,
    /// Prompt requirements; empty selects the built-in list
    pub requirements: Vec<String>,
    /// Pause between consecutive files of a batch
    pub delay_ms: u64,
    pub tool: ToolConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            framework: "pytest".to_string(),
            pattern: DEFAULT_PATTERN.to_string(),
            exclude: default_excludes(),
            requirements: Vec::new(),
            delay_ms: 1000,
            tool: ToolConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from `path`, or from `testgen.yml` in the working
    /// directory when present, falling back to defaults.
    ///
    /// # Errors
    /// * `GenerationError::FileIo` - An explicitly given file cannot be read
    /// * `GenerationError::InvalidInput` - The file is not valid configuration
    pub fn load(path: Option<&Path>) -> Result<Self, GenerationError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = PathBuf::from(CONFIG_FILE);
                if !default_path.is_file() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(&path).map_err(|e| GenerationError::read(&path, e))?;
        Self::from_yaml(&content).map_err(|e| {
            GenerationError::InvalidInput(format!("{}: {}", path.display(), e))
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_claude_cli_and_pytest() {
        let config = GeneratorConfig::default();
        assert_eq!(config.framework, "pytest");
        assert_eq!(config.pattern, "*.py");
        assert_eq!(config.exclude.len(), 6);
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.tool.program, "claude");
        assert_eq!(config.tool.timeout(), None);
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() {
        let config = GeneratorConfig::from_yaml(
            "framework: unittest\ndelay_ms: 0\ntool:\n  timeout_secs: 120\n",
        )
        .unwrap();
        assert_eq!(config.framework, "unittest");
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.tool.program, "claude");
        assert_eq!(config.tool.timeout(), Some(Duration::from_secs(120)));
        assert_eq!(config.pattern, "*.py");
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(
            GeneratorConfig::from_yaml("\n").unwrap(),
            GeneratorConfig::default()
        );
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::load(Some(&dir.path().join("absent.yml"))).unwrap_err();
        assert!(matches!(err, GenerationError::FileIo { .. }));
    }

    #[test]
    fn malformed_file_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testgen.yml");
        fs::write(&path, "delay_ms: [not, a, number]\n").unwrap();
        let err = GeneratorConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidInput(_)));
    }
}
