//! External command execution.
//!
//! Runs the cloud CLI and returns its stdout.

use crate::config;
use colored::Colorize;
use std::error::Error;
use std::process::Command;

/// Run `program` with `args` and return its stdout.
///
/// # Arguments
/// * `program` - Executable name, e.g. [`config::AWS_CLI`]
/// * `args` - Arguments passed as is, without shell splitting
///
/// # Returns
/// * `Ok(String)` - The command's stdout
/// * `Err` - If the command cannot start, exits non-zero, or prints more than
///   [`config::MAX_COMMAND_OUTPUT`] bytes
pub fn run(program: &str, args: &[String]) -> Result<String, Box<dyn Error>> {
    let cmd = command_line(program, args);
    log::debug!("run({cmd})", cmd = cmd.on_blue());

    let output = Command::new(program).args(args).output().map_err(|e| {
        log::error!("Command execution failed: {}", e);
        format!("Failed to execute {program}: {e}")
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        log::trace!(
            "code={code:?}, status={status}\nstderr=\n{stderr}",
            code = output.status.code(),
            status = output.status,
            stderr = stderr.red()
        );
        log::warn!(
            "{failed} to run {cmd}",
            failed = "failed".on_red(),
            cmd = cmd.on_blue()
        );
        return Err(format!("ERROR running {cmd}: {stderr}").into());
    }

    log::debug!("Success output.stdout.len(): {}", output.stdout.len());
    if output.stdout.len() > config::MAX_COMMAND_OUTPUT {
        return Err(format!(
            "Response too large: {} bytes for command: {cmd}",
            output.stdout.len()
        )
        .into());
    }

    let stdout = String::from_utf8(output.stdout).map_err(|e| format!("Invalid UTF-8: {}", e))?;
    Ok(stdout)
}

/// Shell-like rendering of a command for logs; arguments with spaces are quoted.
pub fn command_line(program: &str, args: &[String]) -> String {
    std::iter::once(program.to_string())
        .chain(args.iter().map(|a| {
            if a.is_empty() || a.contains(char::is_whitespace) {
                format!("'{a}'")
            } else {
                a.clone()
            }
        }))
        .collect::<Vec<String>>()
        .join(" ")
}
