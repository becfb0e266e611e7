use anyhow::{Context, Result};
use std::path::Path;
use std::sync::atomic::Ordering;
use tracing::warn;

use testgen::config::GeneratorConfig;
use testgen::contexts::{Discovery, FixedDelay, TestGenerator, analyze_coverage};
use testgen::data::{CoverageReport, GenerationResult};
use testgen::tools::ClaudeCli;

mod progress;

use progress::ProgressIndicator;

#[derive(Clone, Copy)]
pub struct Config {
    pub verbose: bool,
    pub json: bool,
}

/// Prints which sources under `path` lack a companion test
pub fn coverage(path: &Path, config: &Config) -> Result<()> {
    let report = analyze_coverage(path)
        .with_context(|| format!("Failed to analyze coverage of {}", path.display()))?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_coverage(&report);
    }

    Ok(())
}

/// Generates tests for a single file or every candidate under a directory.
///
/// A failing single file is an error; failures in directory mode are only
/// reported in the summary.
pub async fn generate(path: &Path, settings: &GeneratorConfig, config: &Config) -> Result<()> {
    if !path.is_file() && !path.is_dir() {
        anyhow::bail!("{} is neither a file nor a directory", path.display());
    }

    let tool = ClaudeCli::new(&settings.tool);
    let generator = TestGenerator::with_throttle(
        tool,
        settings.framework.clone(),
        FixedDelay::new(settings.delay()),
    )
    .await
    .context("Cannot start test generation")?;

    if path.is_file() {
        let result = generator
            .generate_for_file(path, &settings.requirements)
            .await;
        report_file_result(&result, config)
    } else {
        let discovery = Discovery::new(&settings.pattern, &settings.exclude)?;

        let cancel = generator.cancel_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, stopping after the current file");
                cancel.store(true, Ordering::SeqCst);
            }
        });

        if config.json {
            let summary = generator
                .generate_for_directory(path, &discovery, &settings.requirements, &mut ())
                .await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            let mut progress = ProgressIndicator::new(config.verbose);
            let summary = generator
                .generate_for_directory(path, &discovery, &settings.requirements, &mut progress)
                .await?;
            progress.finish(&summary);
        }

        Ok(())
    }
}

fn report_file_result(result: &GenerationResult, config: &Config) -> Result<()> {
    if config.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else if result.is_success() {
        println!("\n✓ Test generated successfully");
        println!("  Source: {}", result.source_path().display());
        if let Some(test_path) = result.test_path() {
            println!("  Test: {}", test_path.display());
        }
        if let Some(cost) = result.cost() {
            println!("  Cost: ${:.4}", cost);
        }
        if config.verbose {
            if let Some(session_id) = result.session_id() {
                println!("  Session: {}", session_id);
            }
        }
    }

    if let Some(error) = result.error() {
        anyhow::bail!(
            "Failed to generate test for {}: {}",
            result.source_path().display(),
            error
        );
    }

    Ok(())
}

fn print_coverage(report: &CoverageReport) {
    println!("\nTest Coverage Report:");
    println!("Total files: {}", report.total_files);
    println!("Files with tests: {}", report.files_with_tests);
    println!("Files without tests: {}", report.files_without_tests);
    println!("Coverage: {:.2}%", report.coverage_percentage);

    if !report.missing_tests.is_empty() {
        println!("\nFiles missing tests:");
        for file in &report.missing_tests {
            println!("  - {}", file.display());
        }
    }
}
