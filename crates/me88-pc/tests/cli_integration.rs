//! Integration tests for the me88-pc binary.

use clap as _;
use me88_core as _;
use me88_pc as _;
use serde_json as _;
use thiserror as _;
use tracing as _;
use tracing_subscriber as _;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_me88-pc"))
}

fn create_temp_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

const PUSH_POP: &str = "01100000\n00000101\n00001011\n00001100\n00010101\n";

#[test]
fn runs_program_to_halt() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "eprom.txt", PUSH_POP);

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap(), "--quiet"])
        .output()
        .expect("failed to run me88-pc");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("HALTED"));
    assert!(stdout.contains("AL = 05"));
    assert!(stdout.contains("SP = 0000"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("halted after"));
}

#[test]
fn json_format_prints_one_object_per_frame() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "eprom.txt", "00010101\n");

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("failed to run me88-pc");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let frames: Vec<_> = stdout.lines().collect();
    assert!(frames.len() > 1);
    assert!(frames.iter().all(|line| line.starts_with('{')));
    assert!(frames.last().unwrap().contains("\"halted\":true"));
}

#[test]
fn clock_limit_stops_a_looping_program() {
    let temp_dir = tempfile::tempdir().unwrap();
    // jmp 0x0000
    let program = create_temp_file(temp_dir.path(), "loop.txt", "11000000\n00000000\n00000000\n");

    let output = Command::new(binary_path())
        .args([program.to_str().unwrap(), "--max-clocks", "50", "-q"])
        .output()
        .expect("failed to run me88-pc");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stopped at clock limit after 50 clocks"));
}

#[test]
fn debug_mode_quits_on_q() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "eprom.txt", PUSH_POP);

    let mut child = Command::new(binary_path())
        .args([program.to_str().unwrap(), "-d", "--quiet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run me88-pc");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"\n\n\nq\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("quit after 3 clocks"));
}

#[test]
fn malformed_image_fails_with_line_number() {
    let temp_dir = tempfile::tempdir().unwrap();
    let program = create_temp_file(temp_dir.path(), "bad.txt", "00000001\n2\n");

    let output = Command::new(binary_path())
        .arg(program.to_str().unwrap())
        .output()
        .expect("failed to run me88-pc");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: line 2"));
}

#[test]
fn missing_program_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("missing.txt");

    let output = Command::new(binary_path())
        .arg(missing.to_str().unwrap())
        .output()
        .expect("failed to run me88-pc");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: failed to read image"));
}
