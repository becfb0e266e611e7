use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::file_writer::TEST_PREFIX;
use crate::data::CoverageReport;
use crate::error::GenerationError;

/// Directory names never scanned for sources
const SKIPPED_DIRS: &[&str] = &["__pycache__", "venv", "env", ".env"];

const TEST_SUFFIX: &str = "_test.py";

/// Reports which Python sources under `root` have a companion test.
///
/// A source counts as tested when `<dir>/test_<name>` exists, or when
/// `<dir>/<stem>/_test.py` exists. The second form is checked literally as
/// written (a file named `_test.py` inside a directory named after the
/// source stem). Nothing is written.
///
/// # Errors
/// * `GenerationError::InvalidInput` - `root` is not a directory
pub fn analyze_coverage(root: &Path) -> Result<CoverageReport, GenerationError> {
    if !root.is_dir() {
        return Err(GenerationError::InvalidInput(format!(
            "Not a directory: {}",
            root.display()
        )));
    }

    let mut files_with_tests = 0;
    let mut missing_tests = Vec::new();

    for source in collect_sources(root) {
        if has_companion_test(&source) {
            files_with_tests += 1;
        } else {
            debug!("No companion test for {}", source.display());
            missing_tests.push(source);
        }
    }

    let report = CoverageReport::new(files_with_tests, missing_tests);
    info!(
        "Coverage for {}: {}/{} file(s) have tests",
        root.display(),
        report.files_with_tests,
        report.total_files
    );
    Ok(report)
}

/// Whether `source` has a test under either recognized naming convention
pub fn has_companion_test(source: &Path) -> bool {
    let Some(name) = source.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return false;
    };
    let Some(stem) = source.file_stem() else {
        return false;
    };

    let sibling = source.with_file_name(format!("{}{}", TEST_PREFIX, name));
    let nested = source.with_file_name(stem).join("_test.py");

    sibling.is_file() || nested.is_file()
}

fn collect_sources(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| is_source_file(path.strip_prefix(root).unwrap_or(path)))
        .collect()
}

fn is_source_file(relative: &Path) -> bool {
    let Some(name) = relative.file_name().and_then(|n| n.to_str()) else {
        return false;
    };

    if !name.ends_with(".py") || name.starts_with(TEST_PREFIX) || name.ends_with(TEST_SUFFIX) {
        return false;
    }

    !relative.components().any(|component| match component {
        Component::Normal(part) => {
            let part = part.to_string_lossy();
            part.starts_with('.') || SKIPPED_DIRS.iter().any(|dir| part == *dir)
        }
        _ => false,
    })
}
