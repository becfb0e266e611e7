use std::fs;
use std::path::{Path, PathBuf};

use crate::error::GenerationError;

/// Prefix marking a file as a test, both for generated output and for sources
pub const TEST_PREFIX: &str = "test_";

/// Destination of the generated tests for `source`.
///
/// The file lands next to the source as `test_<name>`. A source already named
/// `test_*` keeps its name, so applying the rule again never stacks prefixes.
pub fn test_path_for(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let test_name = if name.starts_with(TEST_PREFIX) {
        name
    } else {
        format!("{}{}", TEST_PREFIX, name)
    };

    source.with_file_name(test_name)
}

/// Writes `test_code` to the destination for `source`, replacing any
/// existing file there.
pub fn write_test_file(source: &Path, test_code: &str) -> Result<PathBuf, GenerationError> {
    let test_path = test_path_for(source);
    fs::write(&test_path, test_code).map_err(|e| GenerationError::write(&test_path, e))?;
    Ok(test_path)
}
