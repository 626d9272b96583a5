//! Copy a glyph to the system clipboard.
//!
//! The platform clipboard tool is tried first, off the UI task and with a
//! timeout. If none is available or all fail, an OSC 52 escape sequence asks
//! the terminal emulator to set the clipboard instead, which also works over
//! SSH. OSC 52 writes to stdout, so it must run on the task that draws.

use base64::{engine::general_purpose::STANDARD, Engine};
use std::io::{self, Write};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// How long one clipboard tool may take before it is killed.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No clipboard backend available")]
    NoBackend,
    #[error("{command} failed: {reason}")]
    CommandFailed { command: &'static str, reason: String },
    #[error("Failed to write to terminal: {0}")]
    Terminal(#[from] io::Error),
}

/// How a copy succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMethod {
    Command(&'static str),
    Osc52,
}

/// Clipboard tools in preference order, with their arguments.
#[cfg(target_os = "macos")]
const COMMANDS: &[(&str, &[&str])] = &[("pbcopy", &[])];

#[cfg(windows)]
const COMMANDS: &[(&str, &[&str])] = &[("clip", &[])];

#[cfg(not(any(target_os = "macos", windows)))]
const COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

/// Copy `glyph` with the first platform tool that succeeds.
pub async fn copy_with_command(glyph: &str) -> Result<&'static str, ClipboardError> {
    let mut last_error = ClipboardError::NoBackend;

    for (command, args) in COMMANDS {
        match run_command(command, args, glyph, COMMAND_TIMEOUT).await {
            Ok(()) => return Ok(command),
            Err(e) => {
                tracing::debug!(command, error = %e, "Clipboard command failed");
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Copy `glyph` through the terminal with OSC 52.
pub fn copy_osc52(glyph: &str) -> Result<CopyMethod, ClipboardError> {
    let mut stdout = io::stdout().lock();
    write_osc52(&mut stdout, glyph)?;
    Ok(CopyMethod::Osc52)
}

async fn run_command(
    command: &'static str,
    args: &[&str],
    text: &str,
    timeout: Duration,
) -> Result<(), ClipboardError> {
    let failed = |reason: String| ClipboardError::CommandFailed { command, reason };

    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| failed(e.to_string()))?;

    let run = async {
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .await
                .map_err(|e| failed(e.to_string()))?;
            // Dropping stdin closes the pipe so the tool sees EOF
        }
        child.wait().await.map_err(|e| failed(e.to_string()))
    };

    let status = tokio::time::timeout(timeout, run)
        .await
        .map_err(|_| failed(format!("timed out after {:?}", timeout)))??;
    if status.success() {
        Ok(())
    } else {
        Err(failed(format!("exited with {}", status)))
    }
}

/// OSC 52 "set clipboard" sequence for `text`.
pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

fn write_osc52<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(osc52_sequence(text).as_bytes())?;
    out.flush()
}
