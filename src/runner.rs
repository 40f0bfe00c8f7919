//! Launching the external disk usage tool.
//!
//! [`ProcessRunner`] is the seam between the collector and the operating
//! system: production code uses [`ShellRunner`] (or [`DirectRunner`]), tests
//! substitute a stub that returns canned output.

use std::ffi::{OsStr, OsString};
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Result, UsageError};

/// Everything the child process wrote, decoded as UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Full standard output
    pub stdout: String,

    /// Full standard error
    pub stderr: String,
}

/// Runs a program to completion and captures both output streams.
pub trait ProcessRunner {
    /// Run `program` with `args` and return its captured output once both
    /// streams have closed.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::Spawn`] when the process cannot be started and
    /// [`UsageError::Stream`] when its output cannot be read.
    fn run(&self, program: &str, args: &[OsString]) -> Result<CapturedOutput>;
}

impl<T: ProcessRunner + ?Sized> ProcessRunner for &T {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CapturedOutput> {
        (**self).run(program, args)
    }
}

/// Runs the tool through the platform command shell.
///
/// The program name is placed on the command line verbatim, so it may carry
/// extra flags (`"du --apparent-size"`); every argument is quoted. On Unix the
/// quoting works on the raw bytes, so non-UTF-8 paths reach the tool intact.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CapturedOutput> {
        let line = command_line(program, args);
        debug!(command = %line.to_string_lossy(), "running through shell");

        let mut command = shell_command(&line);
        capture(&mut command, program)
    }
}

/// Runs the tool directly, without a shell in between.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectRunner;

impl ProcessRunner for DirectRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CapturedOutput> {
        debug!(program, ?args, "running directly");

        let mut command = Command::new(program);
        command.args(args);
        capture(&mut command, program)
    }
}

/// Spawn `command` with piped streams and wait for both to close.
fn capture(command: &mut Command, program: &str) -> Result<CapturedOutput> {
    let child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| UsageError::Spawn {
            program: program.to_string(),
            source,
        })?;

    // Reads stdout and stderr concurrently until both close
    let output = child
        .wait_with_output()
        .map_err(|source| UsageError::Stream { source })?;

    debug!(status = %output.status, "disk usage tool exited");

    Ok(CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(unix)]
fn shell_command(line: &OsStr) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(line);
    command
}

#[cfg(windows)]
fn shell_command(line: &OsStr) -> Command {
    let mut command = Command::new("cmd");
    command.arg("/C").arg(line);
    command
}

/// Join a program and its quoted arguments into a single shell command line.
#[must_use]
pub fn command_line(program: &str, args: &[OsString]) -> OsString {
    let mut line = OsString::from(program);
    for arg in args {
        line.push(" ");
        line.push(quote_arg(arg));
    }
    line
}

/// Characters that never need quoting.
const fn is_plain(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(byte, b'-' | b'_' | b'.' | b'/' | b'=' | b':' | b',' | b'+' | b'@')
}

/// Quote a single argument for `sh`.
///
/// Arguments made only of plain characters are left as they are. Everything
/// else is wrapped in single quotes byte for byte.
#[cfg(unix)]
#[must_use]
pub fn quote_arg(arg: &OsStr) -> OsString {
    use std::os::unix::ffi::{OsStrExt, OsStringExt};

    let bytes = arg.as_bytes();
    if !bytes.is_empty() && bytes.iter().copied().all(is_plain) {
        return arg.to_os_string();
    }

    let mut quoted = Vec::with_capacity(bytes.len() + 2);
    quoted.push(b'\'');
    for &byte in bytes {
        if byte == b'\'' {
            quoted.extend_from_slice(br"'\''");
        } else {
            quoted.push(byte);
        }
    }
    quoted.push(b'\'');
    OsString::from_vec(quoted)
}

/// Quote a single argument for `cmd`.
///
/// Arguments made only of plain characters are left as they are.
#[cfg(windows)]
#[must_use]
pub fn quote_arg(arg: &OsStr) -> OsString {
    let text = arg.to_string_lossy();
    if !text.is_empty() && text.bytes().all(is_plain) {
        return arg.to_os_string();
    }
    OsString::from(format!("\"{}\"", text.replace('"', "\"\"")))
}
