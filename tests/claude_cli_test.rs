//! Process invocation against `sh` scripts standing in for the Claude CLI.
#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use testgen::GenerationError;
use testgen::config::ToolConfig;
use testgen::contexts::{FixedDelay, TestGenerator};
use testgen::data::GenerationTool;
use testgen::tools::ClaudeCli;

const VERSION_BRANCH: &str = r#"if [ "$1" = "--version" ]; then echo "1.0.0 (Fake Code)"; exit 0; fi"#;

/// Writes a fake CLI script and returns a tool config running it through `sh`
fn fake_cli(dir: &Path, body: &str, timeout_secs: Option<u64>) -> ToolConfig {
    let script = dir.join("fake-claude.sh");
    fs::write(&script, format!("{}\n{}\n", VERSION_BRANCH, body)).unwrap();
    ToolConfig {
        program: "sh".to_string(),
        args: vec![script.to_string_lossy().into_owned()],
        timeout_secs,
    }
}

fn source(dir: &Path) -> PathBuf {
    let path = dir.join("calc.py");
    fs::write(&path, "def add(a, b):\n    return a + b\n").unwrap();
    path
}

#[tokio::test]
async fn probe_returns_version() {
    let dir = tempfile::tempdir().unwrap();
    let cli = ClaudeCli::new(&fake_cli(dir.path(), "exit 0", None));
    assert_eq!(cli.probe().await.unwrap(), "1.0.0 (Fake Code)");
}

#[tokio::test]
async fn failing_probe_stops_generator_construction() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("broken.sh");
    fs::write(&script, "echo broken >&2\nexit 3\n").unwrap();
    let cli = ClaudeCli::new(&ToolConfig {
        program: "sh".to_string(),
        args: vec![script.to_string_lossy().into_owned()],
        timeout_secs: None,
    });

    let result = TestGenerator::new(cli, "pytest").await;

    assert!(matches!(result, Err(GenerationError::ToolNotInstalled(_))));
}

#[tokio::test]
async fn structured_reply_is_parsed_and_written() {
    let dir = tempfile::tempdir().unwrap();
    let body = r#"printf '%s' '{"type":"result","result":"def test_add():\n    assert add(1, 2) == 3","session_id":"sess-1","total_cost_usd":0.0125,"duration_ms":2300}'"#;
    let cli = ClaudeCli::new(&fake_cli(dir.path(), body, None));
    let generator = TestGenerator::with_throttle(cli, "pytest", FixedDelay::new(Default::default()))
        .await
        .unwrap();

    let result = generator.generate_for_file(&source(dir.path()), &[]).await;

    assert!(result.is_success(), "{:?}", result.error());
    assert_eq!(result.session_id(), Some("sess-1"));
    assert_eq!(result.cost(), Some(0.0125));
    assert_eq!(result.duration_ms(), Some(2300.0));
    assert_eq!(
        fs::read_to_string(dir.path().join("test_calc.py")).unwrap(),
        "def test_add():\n    assert add(1, 2) == 3"
    );
}

#[tokio::test]
async fn non_zero_exit_fails_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let cli = ClaudeCli::new(&fake_cli(dir.path(), "echo 'rate limited' >&2\nexit 1", None));
    let generator = TestGenerator::new(cli, "pytest").await.unwrap();

    let result = generator.generate_for_file(&source(dir.path()), &[]).await;

    assert!(!result.is_success());
    let error = result.error().unwrap();
    assert!(error.contains("exit status: 1"), "{}", error);
    assert!(!error.contains("rate limited"));
    assert!(!dir.path().join("test_calc.py").exists());
}

#[tokio::test]
async fn stderr_on_success_does_not_change_the_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let body = "echo 'warning: slow model' >&2\nprintf '%s' 'def test_plain(): pass'";
    let cli = ClaudeCli::new(&fake_cli(dir.path(), body, None));

    let output = cli.invoke("prompt").await.unwrap();

    assert_eq!(output, "def test_plain(): pass");
}

#[tokio::test]
async fn prompt_is_escaped_and_json_output_requested() {
    let dir = tempfile::tempdir().unwrap();
    let record = dir.path().join("record");
    fs::create_dir(&record).unwrap();
    let body = format!(
        "printf '%s' \"$1\" > '{0}/flag'\nprintf '%s' \"$2\" > '{0}/prompt'\nprintf '%s %s' \"$3\" \"$4\" > '{0}/format'\necho 'def test_ok(): pass'",
        record.display()
    );
    let cli = ClaudeCli::new(&fake_cli(dir.path(), &body, None));

    cli.invoke(r#"file "calc.py" costs $HOME"#).await.unwrap();

    assert_eq!(fs::read_to_string(record.join("flag")).unwrap(), "-p");
    assert_eq!(
        fs::read_to_string(record.join("prompt")).unwrap(),
        r#"file \"calc.py\" costs \$HOME"#
    );
    assert_eq!(
        fs::read_to_string(record.join("format")).unwrap(),
        "--output-format json"
    );
}

#[tokio::test]
async fn slow_tool_times_out() {
    let dir = tempfile::tempdir().unwrap();
    let cli = ClaudeCli::new(&fake_cli(dir.path(), "sleep 10", Some(1)));

    let err = cli.invoke("prompt").await.unwrap_err();

    assert!(matches!(err, GenerationError::Timeout(_)));
}
