use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use testgen::config::GeneratorConfig;

mod cli;

#[derive(Parser)]
#[command(name = "testgen")]
#[command(about = "Generate tests for Python sources using the Claude Code CLI", long_about = None)]
struct Cli {
    #[arg(help = "File or directory to generate tests for")]
    path: PathBuf,

    #[arg(long, help = "Testing framework to use (default: pytest)")]
    framework: Option<String>,

    #[arg(long, help = "File pattern to match in directory mode (default: *.py)")]
    pattern: Option<String>,

    #[arg(long = "exclude", help = "Exclusion pattern, repeatable; replaces the defaults")]
    excludes: Vec<String>,

    #[arg(long = "requirement", help = "Prompt requirement, repeatable; replaces the defaults")]
    requirements: Vec<String>,

    #[arg(long, help = "Pause between files in directory mode, in milliseconds")]
    delay_ms: Option<u64>,

    #[arg(long, help = "Abort a single tool invocation after this many seconds")]
    timeout_secs: Option<u64>,

    #[arg(long, help = "Configuration file (default: ./testgen.yml when present)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Generate coverage report only")]
    coverage: bool,

    #[arg(long, help = "Print results as JSON")]
    json: bool,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // API keys for the generation tool may live in .env
    dotenvy::dotenv().ok();

    let default_filter = if cli.verbose { "testgen=debug" } else { "testgen=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = GeneratorConfig::load(cli.config.as_deref())?;
    if let Some(framework) = cli.framework {
        settings.framework = framework;
    }
    if let Some(pattern) = cli.pattern {
        settings.pattern = pattern;
    }
    if !cli.excludes.is_empty() {
        settings.exclude = cli.excludes;
    }
    if !cli.requirements.is_empty() {
        settings.requirements = cli.requirements;
    }
    if let Some(delay_ms) = cli.delay_ms {
        settings.delay_ms = delay_ms;
    }
    if cli.timeout_secs.is_some() {
        settings.tool.timeout_secs = cli.timeout_secs;
    }

    let config = cli::Config {
        verbose: cli.verbose,
        json: cli.json,
    };

    if cli.coverage {
        cli::coverage(&cli.path, &config)
    } else {
        cli::generate(&cli.path, &settings, &config).await
    }
}
