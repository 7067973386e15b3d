//! Hypervisor process lifecycle
//!
//! Spawning goes through the `Spawner` trait so the launcher can be driven
//! without creating a real process.

use std::io;
use std::os::unix::process::ExitStatusExt;
use std::process::{ExitStatus, Stdio};

use nix::sys::signal::Signal;

use super::qemu::QemuCommand;

/// How the hypervisor process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Exited normally with this code
    Code(i32),
    /// Killed by this signal number
    Signal(i32),
}

impl ChildExit {
    /// Exit code the launcher reports for this child
    ///
    /// Shell convention: death by signal N becomes 128 + N.
    pub fn exit_code(self) -> i32 {
        match self {
            ChildExit::Code(code) => code,
            ChildExit::Signal(signo) => 128 + signo,
        }
    }

    pub fn success(self) -> bool {
        self == ChildExit::Code(0)
    }

    /// Name of the terminating signal, e.g. `SIGTERM`
    pub fn signal_name(self) -> Option<&'static str> {
        match self {
            ChildExit::Code(_) => None,
            ChildExit::Signal(signo) => Signal::try_from(signo).ok().map(Signal::as_str),
        }
    }
}

impl From<ExitStatus> for ChildExit {
    fn from(status: ExitStatus) -> Self {
        match (status.code(), status.signal()) {
            (Some(code), _) => ChildExit::Code(code),
            (None, Some(signo)) => ChildExit::Signal(signo),
            // Stopped/continued are never reported by wait() without WUNTRACED
            (None, None) => ChildExit::Code(1),
        }
    }
}

/// Runs a hypervisor command to completion
pub trait Spawner {
    /// Spawn `command` and block until it terminates
    fn spawn_and_wait(&mut self, command: &QemuCommand) -> io::Result<ChildExit>;
}

/// Runs the hypervisor in the foreground
///
/// The child inherits stdin, stdout and stderr so the operator can use the
/// guest serial console directly. There is no timeout on the wait.
#[derive(Debug, Default)]
pub struct ForegroundSpawner;

impl Spawner for ForegroundSpawner {
    fn spawn_and_wait(&mut self, command: &QemuCommand) -> io::Result<ChildExit> {
        let mut child = command
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        tracing::debug!(pid = child.id(), program = command.program(), "hypervisor started");

        let status = child.wait()?;
        Ok(ChildExit::from(status))
    }
}
