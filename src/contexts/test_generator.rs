use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::discovery::Discovery;
use super::file_writer::write_test_file;
use super::prompt_builder::PromptBuilder;
use super::result_parser::parse_output;
use super::throttle::{FixedDelay, Throttle};
use crate::data::{BatchSummary, GenerationRequest, GenerationResult, GenerationTool};
use crate::error::GenerationError;

/// Receives per-file progress from a batch run.
pub trait BatchObserver {
    fn file_started(&mut self, _index: usize, _total: usize, _path: &Path) {}

    fn file_finished(&mut self, _result: &GenerationResult) {}
}

impl BatchObserver for () {}

/// Test Generator context drives the per-file pipeline
/// (prompt, invoke, parse, write) and batch runs over discovered files.
pub struct TestGenerator<G, T = FixedDelay>
where
    G: GenerationTool,
    T: Throttle,
{
    /// Backend producing the test code
    tool: G,
    /// Pause between consecutive invocations
    throttle: T,
    prompts: PromptBuilder,
    /// Checked between files of a batch
    cancelled: Arc<AtomicBool>,
}

impl<G: GenerationTool> TestGenerator<G, FixedDelay> {
    /// Creates a generator with the default one second pause between files.
    ///
    /// # Errors
    /// * `GenerationError::ToolNotInstalled` - The tool failed its version probe
    pub async fn new(tool: G, framework: impl Into<String>) -> Result<Self, GenerationError> {
        Self::with_throttle(tool, framework, FixedDelay::default()).await
    }
}

impl<G, T> TestGenerator<G, T>
where
    G: GenerationTool,
    T: Throttle,
{
    /// Creates a generator after checking the tool is reachable, so a missing
    /// tool fails here instead of once per file.
    ///
    /// # Errors
    /// * `GenerationError::ToolNotInstalled` - The tool failed its version probe
    pub async fn with_throttle(
        tool: G,
        framework: impl Into<String>,
        throttle: T,
    ) -> Result<Self, GenerationError> {
        let version = tool.probe().await?;
        info!("Using generation tool {}", version);

        Ok(Self {
            tool,
            throttle,
            prompts: PromptBuilder::new(framework),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    /// Flag that stops a running batch before its next file when set.
    ///
    /// Files already processed stay in the summary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancelled.clone()
    }

    /// Generates tests for one file.
    ///
    /// Failures at any stage are returned as a failed result; the caller
    /// decides whether to surface them.
    pub async fn generate_for_file(&self, path: &Path, requirements: &[String]) -> GenerationResult {
        match self.run_pipeline(path, requirements).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to generate tests for {}: {}", path.display(), e);
                GenerationResult::failed(path.to_path_buf(), e)
            }
        }
    }

    /// Runs the pipeline over `files` in order.
    ///
    /// A failing file is recorded and the batch moves on. The throttle pause
    /// is taken between files, never after the last one.
    pub async fn generate_for_files<O>(
        &self,
        files: &[PathBuf],
        requirements: &[String],
        observer: &mut O,
    ) -> BatchSummary
    where
        O: BatchObserver + ?Sized,
    {
        let started_at = Utc::now();
        let total = files.len();
        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, path) in files.iter().enumerate() {
            if self.cancelled.load(Ordering::SeqCst) {
                warn!(
                    "Batch cancelled after {} of {} file(s)",
                    results.len(),
                    total
                );
                cancelled = true;
                break;
            }

            debug!("[{}/{}] Processing: {}", index + 1, total, path.display());
            observer.file_started(index, total, path);

            let result = self.generate_for_file(path, requirements).await;
            observer.file_finished(&result);
            results.push(result);

            if index + 1 < total && !self.cancelled.load(Ordering::SeqCst) {
                self.throttle.pause().await;
            }
        }

        BatchSummary::from_results(results, cancelled, started_at)
    }

    /// Discovers files under `directory` and generates tests for each.
    ///
    /// # Errors
    /// * `GenerationError::InvalidInput` - `directory` is not a directory
    pub async fn generate_for_directory<O>(
        &self,
        directory: &Path,
        discovery: &Discovery,
        requirements: &[String],
        observer: &mut O,
    ) -> Result<BatchSummary, GenerationError>
    where
        O: BatchObserver + ?Sized,
    {
        let files = discovery.discover(directory)?;
        info!("Found {} files to process", files.len());
        Ok(self.generate_for_files(&files, requirements, observer).await)
    }

    async fn run_pipeline(
        &self,
        path: &Path,
        requirements: &[String],
    ) -> Result<GenerationResult, GenerationError> {
        if !path.is_file() {
            return Err(GenerationError::InvalidInput(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| GenerationError::read(path, e))?;
        let request = GenerationRequest::new(path.to_path_buf(), content, requirements.to_vec());

        let prompt = self.prompts.render(&request);
        let raw = self.tool.invoke(&prompt).await?;
        let parsed = parse_output(&raw)?;

        if parsed.test_code.trim().is_empty() {
            return Err(GenerationError::ExternalToolFailure(
                "Tool returned no test code".to_string(),
            ));
        }

        let test_path = write_test_file(&request.source_path, &parsed.test_code)?;
        debug!("Wrote {}", test_path.display());

        Ok(GenerationResult::succeeded(
            request.source_path,
            test_path,
            parsed,
        ))
    }
}
