mod coverage;
mod generation;
mod tool;

pub use coverage::CoverageReport;
pub use generation::{BatchSummary, GenerationRequest, GenerationResult, ParsedOutput};
pub use tool::GenerationTool;
