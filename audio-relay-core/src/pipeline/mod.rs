pub mod ffmpeg;
pub mod layout;

use std::process::{Command, Stdio};

/// Run a child process to completion. A non-zero exit becomes an error
/// message carrying the tail of stderr.
pub(crate) fn run_checked(program: &str, args: &[String]) -> Result<(), String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| format!("failed to launch {program}: {e}"))?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let mut tail: Vec<&str> = stderr.lines().rev().take(4).collect();
    tail.reverse();
    Err(format!("{program} exited with {}: {}", output.status, tail.join(" | ")))
}
