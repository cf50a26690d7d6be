use std::process::Command;
use tempfile::TempDir;

fn lifelog_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_lifelog"));
    cmd.env("LIFELOG_DIR", dir.path());
    cmd
}

#[test]
fn test_problem_then_list() {
    let tmp = TempDir::new().unwrap();

    let output = lifelog_cmd(&tmp)
        .args(["p", "the", "build", "is", "flaky"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("the build is flaky"));
    assert!(tmp.path().join("problems.json").exists());

    let output = lifelog_cmd(&tmp).args(["list"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("the build is flaky"));
    assert!(stdout.contains("Just now"));
}

#[test]
fn test_list_when_empty() {
    let tmp = TempDir::new().unwrap();

    let output = lifelog_cmd(&tmp).args(["list"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No problems logged yet"));
}

#[test]
fn test_search_finds_substring() {
    let tmp = TempDir::new().unwrap();

    lifelog_cmd(&tmp)
        .args(["p", "wifi drops on resume"])
        .output()
        .unwrap();
    lifelog_cmd(&tmp)
        .args(["p", "slow database queries"])
        .output()
        .unwrap();

    let output = lifelog_cmd(&tmp).args(["search", "WIFI"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wifi drops on resume"));
    assert!(!stdout.contains("slow database queries"));
}

#[test]
fn test_today_shows_fresh_problems() {
    let tmp = TempDir::new().unwrap();

    lifelog_cmd(&tmp)
        .args(["p", "logged just now"])
        .output()
        .unwrap();

    let output = lifelog_cmd(&tmp).args(["today"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("logged just now"));
}

#[test]
fn test_delete_requires_force_when_not_interactive() {
    let tmp = TempDir::new().unwrap();

    lifelog_cmd(&tmp)
        .args(["p", "delete me"])
        .output()
        .unwrap();

    // Piped stdin is not a tty, so deletion without --force must abort.
    let output = lifelog_cmd(&tmp)
        .args(["delete", "delete me"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--force"));

    let output = lifelog_cmd(&tmp)
        .args(["delete", "delete me", "--force"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = lifelog_cmd(&tmp).args(["list"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No problems logged yet"));
}

#[test]
fn test_delete_without_match_fails() {
    let tmp = TempDir::new().unwrap();

    let output = lifelog_cmd(&tmp)
        .args(["delete", "nothing here", "--force"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no problems match"));
}

#[test]
fn test_corrupt_storage_reports_error() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("problems.json"), "{definitely not json").unwrap();

    let output = lifelog_cmd(&tmp).args(["list"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("corrupt"));
}

#[test]
fn test_config_set_and_show_masks_key() {
    let tmp = TempDir::new().unwrap();

    let output = lifelog_cmd(&tmp)
        .args(["config", "set", "apiKey", "sk-abcdefghijklmnop"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = lifelog_cmd(&tmp)
        .args(["config", "set", "provider", "ollama"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = lifelog_cmd(&tmp).args(["config", "show"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ollama"));
    assert!(!stdout.contains("sk-abcdefghijklmnop"));
    assert!(stdout.contains("sk-a"));
}

#[test]
fn test_config_set_unknown_key_fails() {
    let tmp = TempDir::new().unwrap();

    let output = lifelog_cmd(&tmp)
        .args(["config", "set", "banana", "yellow"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown config key"));
}

#[test]
fn test_dir_flag_overrides_env() {
    let env_dir = TempDir::new().unwrap();
    let flag_dir = TempDir::new().unwrap();

    let output = lifelog_cmd(&env_dir)
        .args(["--dir", flag_dir.path().to_str().unwrap(), "p", "goes to flag dir"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(flag_dir.path().join("problems.json").exists());
    assert!(!env_dir.path().join("problems.json").exists());
}

#[test]
fn test_review_without_ai_configured_fails_cleanly() {
    let tmp = TempDir::new().unwrap();

    lifelog_cmd(&tmp)
        .args(["p", "something to review"])
        .output()
        .unwrap();

    let output = lifelog_cmd(&tmp).args(["review", "--all"]).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("AI features are disabled"));
}
