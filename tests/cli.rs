use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_subcommands() {
    Command::cargo_bin("scrib")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("transcribe"))
        .stdout(predicate::str::contains("build-image"));
}

#[test]
fn test_transcribe_requires_audio_file() {
    Command::cargo_bin("scrib")
        .unwrap()
        .arg("transcribe")
        .assert()
        .failure();
}

#[test]
fn test_unavailable_tool_is_reported() {
    Command::cargo_bin("scrib")
        .unwrap()
        .env("SCRIB_CONTAINER_TOOL", "scrib-missing-tool")
        .env("SCRIB_NO_NOTIFY", "1")
        .args(["transcribe", "nope.mp3"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("required command not available"));
}
