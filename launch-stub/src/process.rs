//! Child process creation.

use std::process::Command;

use tracing::debug;

use crate::cmdline::CommandLine;
use crate::error::{LaunchError, Result};

/// Spawns the child described by `cmdline`, inheriting the stub's standard
/// handles, and blocks until it terminates.
///
/// Returns the child's exit code unchanged; on Unix a signal death maps to
/// `128 + signal`. A spawn refusal is fatal and not retried. There is no
/// detached mode: the stub's lifetime is the child's lifetime.
pub fn launch(cmdline: &CommandLine) -> Result<i32> {
    debug!(command_line = cmdline.as_str(), "launching child process");
    let mut command = Command::new(cmdline.executable());
    configure_args(&mut command, cmdline);
    let mut child = command.spawn().map_err(|source| LaunchError::SpawnFailure {
        executable: cmdline.executable().to_owned(),
        source,
    })?;
    let status = child.wait()?;
    Ok(exit_code(status))
}

// The child must see exactly the line the builder produced; raw_arg keeps
// std from re-quoting it.
#[cfg(windows)]
fn configure_args(command: &mut Command, cmdline: &CommandLine) {
    use std::os::windows::process::CommandExt;
    if !cmdline.raw_args().is_empty() {
        command.raw_arg(cmdline.raw_args());
    }
}

// Process creation takes a real argument vector here; the flat line only
// exists to enforce the length cap.
#[cfg(not(windows))]
fn configure_args(command: &mut Command, cmdline: &CommandLine) {
    command.args(cmdline.args());
}

#[cfg(unix)]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .unwrap_or_else(|| 128 + status.signal().unwrap_or(0))
}

#[cfg(not(unix))]
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn returns_the_child_exit_code_verbatim() {
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let cmdline = CommandLine::build("/bin/sh", &args).unwrap();
        assert_eq!(launch(&cmdline).unwrap(), 3);
    }

    #[test]
    fn zero_exit_code_passes_through() {
        let args = vec!["-c".to_string(), "true".to_string()];
        let cmdline = CommandLine::build("/bin/sh", &args).unwrap();
        assert_eq!(launch(&cmdline).unwrap(), 0);
    }

    #[test]
    fn spawn_refusal_is_fatal() {
        let cmdline = CommandLine::build("/no/such/interpreter", &[]).unwrap();
        let err = launch(&cmdline).unwrap_err();
        assert!(matches!(err, LaunchError::SpawnFailure { .. }));
    }
}
