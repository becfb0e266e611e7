use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything needed to ask the tool for tests covering one source file.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub source_path: PathBuf,
    pub source_content: String,
    /// Caller supplied requirements; empty means "use the defaults"
    pub requirements: Vec<String>,
}

impl GenerationRequest {
    pub fn new(source_path: PathBuf, source_content: String, requirements: Vec<String>) -> Self {
        Self {
            source_path,
            source_content,
            requirements,
        }
    }

    /// File name shown to the tool in the prompt
    pub fn display_name(&self) -> String {
        self.source_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source_path.display().to_string())
    }
}

/// Normalized view of the tool's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOutput {
    pub test_code: String,
    pub session_id: Option<String>,
    pub cost: Option<f64>,
    pub duration_ms: Option<f64>,
}

impl ParsedOutput {
    /// Output carrying only code, as produced by the plain-text fallback
    pub fn plain(test_code: impl Into<String>) -> Self {
        Self {
            test_code: test_code.into(),
            session_id: None,
            cost: None,
            duration_ms: None,
        }
    }
}

/// Outcome of generating tests for a single source file.
///
/// A result is built either through [`GenerationResult::succeeded`] or
/// [`GenerationResult::failed`], so test path and code are present exactly
/// when `error` is absent.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    success: bool,
    source_path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl GenerationResult {
    pub fn succeeded(source_path: PathBuf, test_path: PathBuf, output: ParsedOutput) -> Self {
        debug_assert!(!output.test_code.is_empty());
        Self {
            success: true,
            source_path,
            test_path: Some(test_path),
            test_code: Some(output.test_code),
            session_id: output.session_id,
            cost: output.cost,
            duration_ms: output.duration_ms,
            error: None,
        }
    }

    pub fn failed(source_path: PathBuf, error: impl ToString) -> Self {
        Self {
            success: false,
            source_path,
            test_path: None,
            test_code: None,
            session_id: None,
            cost: None,
            duration_ms: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn test_path(&self) -> Option<&Path> {
        self.test_path.as_deref()
    }

    pub fn test_code(&self) -> Option<&str> {
        self.test_code.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn duration_ms(&self) -> Option<f64> {
        self.duration_ms
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Aggregate of a batch run, results kept in discovery order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_cost: f64,
    /// Set when the run stopped early; `results` then holds the completed files only
    pub cancelled: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<GenerationResult>,
}

impl BatchSummary {
    /// Partitions results and sums the cost of successful ones.
    ///
    /// A missing cost counts as zero.
    pub fn from_results(
        results: Vec<GenerationResult>,
        cancelled: bool,
        started_at: DateTime<Utc>,
    ) -> Self {
        let successful = results.iter().filter(|r| r.is_success()).count();
        let total_cost = results
            .iter()
            .filter(|r| r.is_success())
            .filter_map(|r| r.cost())
            .sum();

        Self {
            total: results.len(),
            successful,
            failed: results.len() - successful,
            total_cost,
            cancelled,
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &GenerationResult> {
        self.results.iter().filter(|r| !r.is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(name: &str, cost: Option<f64>) -> GenerationResult {
        GenerationResult::succeeded(
            PathBuf::from(name),
            PathBuf::from(format!("test_{}", name)),
            ParsedOutput {
                cost,
                ..ParsedOutput::plain("def test_x(): assert True")
            },
        )
    }

    #[test]
    fn succeeded_result_has_code_and_path_but_no_error() {
        let result = generated("app.py", Some(0.5));
        assert!(result.is_success());
        assert_eq!(result.test_path(), Some(Path::new("test_app.py")));
        assert!(result.test_code().is_some());
        assert!(result.error().is_none());
    }

    #[test]
    fn failed_result_has_error_only() {
        let result = GenerationResult::failed(PathBuf::from("app.py"), "boom");
        assert!(!result.is_success());
        assert_eq!(result.error(), Some("boom"));
        assert!(result.test_path().is_none());
        assert!(result.test_code().is_none());
        assert!(result.cost().is_none());
    }

    #[test]
    fn summary_counts_and_costs_only_successes() {
        let mut failed = GenerationResult::failed(PathBuf::from("b.py"), "tool exited 1");
        failed.cost = Some(9.0);
        let results = vec![generated("a.py", Some(0.25)), failed, generated("c.py", None)];

        let summary = BatchSummary::from_results(results, false, Utc::now());

        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total, summary.successful + summary.failed);
        assert!((summary.total_cost - 0.25).abs() < f64::EPSILON);
        assert_eq!(summary.failures().count(), 1);
    }

    #[test]
    fn empty_summary_is_all_zero() {
        let summary = BatchSummary::from_results(Vec::new(), false, Utc::now());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.total_cost, 0.0);
    }

    #[test]
    fn serialized_result_omits_absent_fields() {
        let json = serde_json::to_value(GenerationResult::failed(PathBuf::from("a.py"), "x"))
            .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "x");
        assert!(json.get("test_path").is_none());
        assert!(json.get("test_code").is_none());
    }

    #[test]
    fn display_name_is_file_name() {
        let request = GenerationRequest::new(
            PathBuf::from("src/pkg/utils.py"),
            String::new(),
            Vec::new(),
        );
        assert_eq!(request.display_name(), "utils.py");
    }
}
