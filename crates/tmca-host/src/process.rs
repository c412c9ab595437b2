//! Synchronous external command execution

use std::process::Command;
use tmca_core::{Error, Result};
use tracing::debug;

/// Make sure `program` is on PATH before trying to run it
pub(crate) fn require(program: &str) -> Result<()> {
    which::which(program)
        .map(|_| ())
        .map_err(|_| Error::command_not_found(program))
}

/// Run `cmd` to completion, turning a non-zero exit into [`Error::CommandFailed`]
pub(crate) fn run(cmd: &mut Command) -> Result<String> {
    let label = describe(cmd);
    debug!("Running: {}", label);

    let output = cmd.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(Error::command_failed(label, output.status.to_string(), stderr));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}
