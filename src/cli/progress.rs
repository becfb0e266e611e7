use std::path::Path;
use std::time::Instant;

use testgen::contexts::BatchObserver;
use testgen::data::{BatchSummary, GenerationResult};

pub struct ProgressIndicator {
    verbose: bool,
    completed: usize,
    failed: usize,
    start_time: Instant,
}

impl ProgressIndicator {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            completed: 0,
            failed: 0,
            start_time: Instant::now(),
        }
    }

    pub fn finish(&self, summary: &BatchSummary) {
        let elapsed = self.start_time.elapsed();
        println!("\n{}", "=".repeat(60));
        println!("Test Generation Summary:");
        println!("  Total:      {}", summary.total);
        println!("  Successful: {}", summary.successful);
        println!("  Failed:     {}", summary.failed);
        println!("  Cost:       ${:.4}", summary.total_cost);
        println!("  Duration:   {:.2}s", elapsed.as_secs_f64());
        if summary.cancelled {
            println!("  Cancelled before all files were processed");
        }
        println!("{}", "=".repeat(60));

        if summary.failed > 0 {
            println!("\nFailed files:");
            for result in summary.failures() {
                println!(
                    "  - {}: {}",
                    result.source_path().display(),
                    result.error().unwrap_or("unknown error")
                );
            }
        }
    }
}

impl BatchObserver for ProgressIndicator {
    fn file_started(&mut self, index: usize, total: usize, path: &Path) {
        println!("[{}/{}] Processing: {}", index + 1, total, path.display());
    }

    fn file_finished(&mut self, result: &GenerationResult) {
        if result.is_success() {
            self.completed += 1;
            if self.verbose {
                if let Some(test_path) = result.test_path() {
                    println!("✓ Wrote {}", test_path.display());
                }
            }
        } else {
            self.failed += 1;
            eprintln!(
                "✗ Failed to generate tests for {}: {}",
                result.source_path().display(),
                result.error().unwrap_or("unknown error")
            );
        }
    }
}
