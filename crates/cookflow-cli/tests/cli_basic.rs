//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a scratch directory
//! so config writes never touch the real user profile.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

const PANCAKES: &str = r#"
title = "Pancakes"
servings = 2

[[steps]]
id = "mix"
title = "Mix batter"
ingredient = "flour"
amount = 200.0
unit = "g"

[[steps]]
id = "rest"
title = "Rest batter"
duration_secs = 1
auto_advance = true

[[steps]]
id = "fry"
title = "Fry"
ingredient = "butter"
amount = 10.0
unit = "g"
"#;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str], stdin: &str) -> (i32, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_cookflow-cli"))
        .args(args)
        .env("HOME", home)
        .env_remove("COOKFLOW_ENV")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.code().unwrap_or(-1), stdout, stderr)
}

fn write_recipe(dir: &Path, body: &str) -> String {
    let path = dir.join("recipe.toml");
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

fn json_lines(stdout: &str) -> Vec<serde_json::Value> {
    stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("every output line is JSON"))
        .collect()
}

#[test]
fn test_recipe_validate() {
    let home = tempfile::tempdir().unwrap();
    let recipe = write_recipe(home.path(), PANCAKES);
    let (code, stdout, _) = run_cli(home.path(), &["recipe", "validate", &recipe], "");
    assert_eq!(code, 0, "recipe validate failed");
    assert_eq!(stdout.trim(), "ok: 3 steps");
}

#[test]
fn test_recipe_validate_rejects_duplicate_ids() {
    let home = tempfile::tempdir().unwrap();
    let body = r#"
        title = "Bad"
        [[steps]]
        id = "a"
        title = "One"
        [[steps]]
        id = "a"
        title = "Two"
    "#;
    let recipe = write_recipe(home.path(), body);
    let (code, _, stderr) = run_cli(home.path(), &["recipe", "validate", &recipe], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_recipe_show_json() {
    let home = tempfile::tempdir().unwrap();
    let recipe = write_recipe(home.path(), PANCAKES);
    let (code, stdout, _) = run_cli(home.path(), &["recipe", "show", &recipe], "");
    assert_eq!(code, 0, "recipe show failed");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["title"], "Pancakes");
    assert_eq!(parsed["total_duration_secs"], 1);
    assert_eq!(parsed["steps"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["deductions"]["0"]["ingredient"], "flour");
    assert_eq!(parsed["deductions"]["2"]["ingredient"], "butter");
}

#[test]
fn test_config_get_set() {
    let home = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "session.gesture_cooldown_ms"], "");
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "1200");

    let (code, _, _) = run_cli(
        home.path(),
        &["config", "set", "session.gesture_cooldown_ms", "800"],
        "",
    );
    assert_eq!(code, 0, "config set failed");
    assert!(home.path().join(".config/cookflow/config.toml").exists());

    let (_, stdout, _) = run_cli(home.path(), &["config", "get", "session.gesture_cooldown_ms"], "");
    assert_eq!(stdout.trim(), "800");
}

#[test]
fn test_config_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["config", "set", "session.bogus", "1"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_session_run_to_completion() {
    let home = tempfile::tempdir().unwrap();
    let recipe = write_recipe(home.path(), PANCAKES);
    let (code, stdout, _) = run_cli(
        home.path(),
        &["session", "run", "--tick-ms", "600000", &recipe],
        "start\nnext\ntick\nnext please\n",
    );
    assert_eq!(code, 0, "session run failed");

    // The clock never fires at this interval; only the explicit `tick` does.
    let lines = json_lines(&stdout);
    let timeline: Vec<&str> = lines
        .iter()
        .filter(|l| l["stream"] == "timeline")
        .map(|l| l["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        timeline,
        vec![
            "step_start",
            "inventory_deduct",
            "step_complete",
            "step_start",
            "timer_tick",
            "timer_done",
            "step_complete",
            "step_start",
            "inventory_deduct",
            "step_complete",
            "recipe_complete",
        ]
    );

    let last = lines.last().unwrap();
    assert_eq!(last["stream"], "snapshot");
    assert_eq!(last["session"]["phase"], "complete");
    assert_eq!(last["session"]["current_step"], 2);
}

#[test]
fn test_session_gestures_and_exit() {
    let home = tempfile::tempdir().unwrap();
    let recipe = write_recipe(home.path(), PANCAKES);
    let (code, stdout, _) = run_cli(
        home.path(),
        &["session", "run", "--autostart", "--tick-ms", "600000", &recipe],
        "gesture thumb_up 0.3\ngesture open_palm 0.9\nstatus\nexit\n",
    );
    assert_eq!(code, 0, "session run failed");

    let lines = json_lines(&stdout);
    let status = lines
        .iter()
        .find(|l| l["stream"] == "snapshot")
        .expect("status prints a snapshot");
    assert_eq!(status["session"]["phase"], "paused");
    assert_eq!(status["session"]["current_step"], 0);
    assert_eq!(status["session"]["last_gesture"], "open_palm");

    let last = lines.last().unwrap();
    assert_eq!(last["session"]["phase"], "idle");
}
