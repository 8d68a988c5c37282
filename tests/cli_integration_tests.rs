use std::process::Command;

/// Test helper to run the CLI binary and capture output
fn run_cli_command(args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_skillkit"))
        .args(args)
        .env("NO_COLOR", "1")
        .env("SKILLKIT_BASE_URL", "http://127.0.0.1:9")
        .env_remove("SKILLKIT_API_KEY")
        .env_remove("SKILLKIT_TIMEOUT_SECONDS")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let exit_code = output.status.code().unwrap_or(-1);

    (stdout, stderr, exit_code)
}

/// Test helper to check if output contains expected text
fn assert_output_contains(output: &str, expected: &str) {
    assert!(
        output.contains(expected),
        "Output did not contain expected text.\nExpected: {}\nActual output:\n{}",
        expected,
        output
    );
}

#[test]
fn test_cli_help_command() {
    let (stdout, _stderr, exit_code) = run_cli_command(&["--help"]);

    assert_eq!(exit_code, 0);
    assert_output_contains(&stdout, "Commands:");
    assert_output_contains(&stdout, "image");
    assert_output_contains(&stdout, "asr");
    assert_output_contains(&stdout, "tts");
    assert_output_contains(&stdout, "search");
}

#[test]
fn test_cli_version_command() {
    let (stdout, _stderr, exit_code) = run_cli_command(&["--version"]);

    assert_eq!(exit_code, 0);
    assert_output_contains(&stdout, "0.1.0");
}

#[test]
fn test_tts_help_lists_voices() {
    let (stdout, _stderr, exit_code) = run_cli_command(&["tts", "--help"]);

    assert_eq!(exit_code, 0);
    assert_output_contains(&stdout, "--texts");
    assert_output_contains(&stdout, "--sample-rate");
    assert_output_contains(&stdout, "zh_female_xiaohe_uranus_bigtts");
    assert_output_contains(&stdout, "Available Voices:");
}

#[test]
fn test_image_help() {
    let (stdout, _stderr, exit_code) = run_cli_command(&["image", "--help"]);

    assert_eq!(exit_code, 0);
    assert_output_contains(&stdout, "--prompt");
    assert_output_contains(&stdout, "--max-sequential");
    assert_output_contains(&stdout, "[default: 2K]");
}

#[test]
fn test_search_without_query_fails() {
    let (stdout, stderr, exit_code) = run_cli_command(&["search", "--format", "json"]);

    assert_eq!(exit_code, 1);
    assert!(stdout.is_empty());
    assert_output_contains(&stderr, "Error:");
    assert_output_contains(&stderr, "--query is required");
}

#[test]
fn test_asr_missing_file_fails_before_network() {
    let (_stdout, stderr, exit_code) = run_cli_command(&["asr", "--file", "/no/such/file.wav"]);

    assert_eq!(exit_code, 1);
    assert_output_contains(&stderr, "File not found: /no/such/file.wav");
}

#[test]
fn test_tts_without_text_fails() {
    let (_stdout, stderr, exit_code) = run_cli_command(&["tts"]);

    assert_eq!(exit_code, 1);
    assert_output_contains(&stderr, "--text or --texts is required");
}

#[test]
fn test_invalid_numeric_value_is_rejected() {
    let (_stdout, stderr, exit_code) = run_cli_command(&["tts", "--text", "hi", "--speech-rate", "500"]);

    assert_eq!(exit_code, 1);
    assert_output_contains(&stderr, "--speech-rate");
}

#[test]
fn test_invalid_format_is_rejected() {
    let (_stdout, stderr, exit_code) = run_cli_command(&["search", "-q", "x", "--format", "yaml"]);

    assert_eq!(exit_code, 1);
    assert_output_contains(&stderr, "yaml");
}

#[test]
fn test_invalid_config_file_fails() {
    let (_stdout, stderr, exit_code) =
        run_cli_command(&["--config", "/no/such/config.json", "search", "-q", "x"]);

    assert_eq!(exit_code, 1);
    assert_output_contains(&stderr, "Configuration error");
}

#[test]
fn test_unreachable_service_per_item_failures_keep_exit_zero() {
    let (stdout, stderr, exit_code) = run_cli_command(&["tts", "--texts", "one", "two"]);

    assert_eq!(exit_code, 0);
    assert_output_contains(&stdout, "[1/2] one");
    assert_output_contains(&stdout, "[2/2] two");
    assert_eq!(stderr.matches("  Error: HTTP request failed").count(), 2);
}
