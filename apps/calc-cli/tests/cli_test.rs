use anyhow::Result;
use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::tempdir;

fn run_cli(args: &[&str], stdin: &str) -> Result<Output> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_calc-cli"))
        .arg("--plain")
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut pipe = child.stdin.take().expect("stdin is piped");
    // The binary may exit before reading anything, e.g. on a config error.
    if let Err(e) = pipe.write_all(stdin.as_bytes()) {
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(e.into());
        }
    }
    drop(pipe);
    Ok(child.wait_with_output()?)
}

#[test]
fn test_piped_session() -> Result<()> {
    let output = run_cli(&[], "+\n2 3\nf\n-1\nz\nq\n")?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("=== Simple Calculator ==="));
    assert!(stdout.contains("Result: 5\n"));
    assert!(stdout.contains("Error: Factorial requires a non-negative integer!\n"));
    assert!(stdout.contains("Unknown operation 'z'! Please try again.\n"));
    assert!(stdout.trim_end().ends_with("Goodbye!"));
    Ok(())
}

#[test]
fn test_eof_exits_cleanly() -> Result<()> {
    let output = run_cli(&[], "")?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Goodbye!"));
    Ok(())
}

#[test]
fn test_config_file_and_overrides() -> Result<()> {
    let tmp = tempdir()?;
    let path = tmp.path().join("calc.json");
    std::fs::write(&path, r#"{ "title": "Desk Calc", "precision": 4 }"#)?;

    let path_arg = path.to_string_lossy().to_string();
    let output = run_cli(&["--config", &path_arg], "/\n2 3\nq\n")?;
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("=== Desk Calc ==="));
    assert!(stdout.contains("Result: 0.6667\n"));

    let output = run_cli(&["--config", &path_arg, "--precision", "1"], "/\n2 3\nq\n")?;
    assert!(String::from_utf8(output.stdout)?.contains("Result: 0.7\n"));
    Ok(())
}

#[test]
fn test_invalid_config_fails() -> Result<()> {
    let output = run_cli(&["--precision", "50"], "q\n")?;
    assert!(!output.status.success());
    Ok(())
}

#[test]
fn test_rust_log_silences_debug_flag() -> Result<()> {
    let output = run_cli(&["--debug"], "s\n3\nq\n")?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Result: 9\n"));
    assert!(output.stderr.is_empty());
    Ok(())
}
