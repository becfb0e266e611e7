use serde::Serialize;
use std::path::PathBuf;

/// Which source files have a companion test, and the resulting ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub total_files: usize,
    pub files_with_tests: usize,
    pub files_without_tests: usize,
    /// Percentage in `0.0..=100.0`, `0.0` for an empty tree
    pub coverage_percentage: f64,
    pub missing_tests: Vec<PathBuf>,
}

impl CoverageReport {
    pub fn new(files_with_tests: usize, missing_tests: Vec<PathBuf>) -> Self {
        let total_files = files_with_tests + missing_tests.len();
        let coverage_percentage = if total_files > 0 {
            files_with_tests as f64 / total_files as f64 * 100.0
        } else {
            0.0
        };

        Self {
            total_files,
            files_with_tests,
            files_without_tests: missing_tests.len(),
            coverage_percentage,
            missing_tests,
        }
    }
}
