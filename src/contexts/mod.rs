mod coverage_analyzer;
mod discovery;
mod file_writer;
mod prompt_builder;
mod result_parser;
mod test_generator;
mod throttle;

pub use coverage_analyzer::{analyze_coverage, has_companion_test};
pub use discovery::{DEFAULT_EXCLUDES, DEFAULT_PATTERN, Discovery, default_excludes};
pub use file_writer::{TEST_PREFIX, test_path_for, write_test_file};
pub use prompt_builder::PromptBuilder;
pub use result_parser::parse_output;
pub use test_generator::{BatchObserver, TestGenerator};
pub use throttle::{FixedDelay, Throttle};
