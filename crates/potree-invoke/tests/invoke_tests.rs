//! Process invocation tests
//!
//! A POSIX shell stands in for the extraction executable: the "input path"
//! is a script, so `sh <script> <region> <width> <min> <max>` sees the same
//! positional arguments the real tool would.

#![cfg(unix)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::fs;
use std::path::{Path, PathBuf};

use potree_frame::FrameError;
use potree_invoke::{ConfigLayer, ExtractConfig, InvokeError, invoke, run_captured};
use tempfile::TempDir;

fn write_script(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("extract.sh");
    fs::write(&path, body).expect("script should be written");
    path
}

fn shell_config(script: &Path) -> ExtractConfig {
    ExtractConfig::new(
        "/bin/sh",
        script,
        "{693550.968, 3915914.169},{693890.618, 3916387.819}"
            .parse()
            .unwrap(),
        14.0,
        0,
        1,
    )
    .unwrap()
}

#[test]
fn test_invoke_decodes_hello_world() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "printf '\\005\\000\\000\\000hello'\nprintf 'WORLD'\n");

    let response = invoke(&shell_config(&script)).expect("invoke should succeed");

    assert_eq!(response.header(), "hello");
    assert_eq!(response.payload(), b"WORLD");
}

#[test]
fn test_invoke_passes_positional_arguments_in_order() {
    let dir = TempDir::new().unwrap();
    let args_file = dir.path().join("args.txt");
    let script = write_script(
        &dir,
        &format!(
            "printf '%s\\n' \"$@\" > '{}'\nprintf '\\000\\000\\000\\000'\n",
            args_file.display()
        ),
    );

    let response = invoke(&shell_config(&script)).expect("invoke should succeed");
    let args = fs::read_to_string(&args_file).unwrap();

    assert_eq!(response.header(), "");
    assert!(response.payload().is_empty());
    assert_eq!(
        args.lines().collect::<Vec<_>>(),
        vec![
            "{693550.968, 3915914.169},{693890.618, 3916387.819}",
            "14",
            "0",
            "1"
        ]
    );
}

#[test]
fn test_failed_exit_reports_code_and_stderr() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo 'ERROR: not a valid potree file path' >&2\nexit 123\n");

    let result = invoke(&shell_config(&script));

    assert!(matches!(
        result,
        Err(InvokeError::ProcessInvocation {
            exit_code: Some(123),
            ref stderr,
        }) if stderr == "ERROR: not a valid potree file path"
    ));
}

#[test]
fn test_truncated_output_is_malformed() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "printf '\\050\\000\\000\\000short'\n");

    let result = invoke(&shell_config(&script));

    assert!(matches!(
        result,
        Err(InvokeError::Frame(FrameError::MalformedResponse { declared: 40, .. }))
    ));
}

#[test]
fn test_non_ascii_header_is_encoding_error() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "printf '\\002\\000\\000\\000\\303\\251'\n");

    let result = invoke(&shell_config(&script));

    assert!(matches!(
        result,
        Err(InvokeError::Frame(FrameError::Encoding { offset: 0, byte: 0xc3 }))
    ));
}

#[test]
fn test_run_captured_keeps_raw_stdout() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "printf 'xy'\n");

    let captured = run_captured(&shell_config(&script)).expect("run should succeed");

    assert!(captured.status().success());
    assert_eq!(captured.stdout(), b"xy");
    assert!(matches!(
        captured.into_response(),
        Err(InvokeError::Frame(FrameError::MalformedResponse { .. }))
    ));
}

#[test]
fn test_missing_executable_fails_before_spawn() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "exit 0\n");
    let config = ExtractConfig::new(
        dir.path().join("no-such-tool"),
        &script,
        "{0,0}".parse().unwrap(),
        1.0,
        0,
        0,
    )
    .unwrap();

    let result = invoke(&config);

    assert!(matches!(result, Err(InvokeError::ExecutableNotFound { .. })));
}

#[test]
fn test_config_file_drives_invocation() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "printf '\\002\\000\\000\\000{}'\nprintf '\\001\\002'\n");
    let config_path = dir.path().join("extract.toml");
    fs::write(
        &config_path,
        format!(
            "executable_path = \"/bin/sh\"\n\
             input_path = \"{}\"\n\
             region_coordinates = \"{{0, 0}},{{5, 5}}\"\n\
             width = 2.0\n",
            script.display()
        ),
    )
    .unwrap();

    let config = ConfigLayer::from_file(&config_path)
        .unwrap()
        .build()
        .unwrap();
    let response = invoke(&config).expect("invoke should succeed");

    assert_eq!(response.header(), "{}");
    assert_eq!(response.payload(), &[1, 2]);
}

#[test]
fn test_missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();

    let result = ConfigLayer::from_file(&dir.path().join("absent.toml"));

    assert!(matches!(result, Err(InvokeError::ConfigFile { .. })));
}
