//! Launcher error taxonomy and exit codes
//!
//! Every failure the launcher can hit before or around the hypervisor spawn
//! maps to one `LauncherError` variant, and every variant maps to a stable
//! process exit code:
//!
//! ```text
//! 0   dry run, or hypervisor exited 0
//! 1   any other launcher failure (directory resolution, rendering, stdout)
//! 2   usage error (raised by clap before any side effect)
//! 3   memory cgroup setup failed, hypervisor never spawned
//! 4   hypervisor could not be spawned or waited on
//! N   hypervisor exit code N, or 128 + signal when it was killed
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_RESOURCE_GROUP: i32 = 3;
pub const EXIT_LAUNCH: i32 = 4;

#[derive(Debug, Error)]
pub enum LauncherError {
    /// Creating the cgroup directory or writing its `tasks` file failed
    #[error("memory cgroup setup failed at {}: {source}", .path.display())]
    ResourceGroup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The hypervisor process could not be created or waited on
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("cannot resolve launcher directory: {0}")]
    ScriptDir(#[source] io::Error),

    #[error("launcher directory {} is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("cannot render command line: {0}")]
    Render(#[from] shlex::QuoteError),

    #[error("failed to write to stdout: {0}")]
    Output(#[source] io::Error),
}

impl LauncherError {
    pub fn exit_code(&self) -> i32 {
        match self {
            LauncherError::ResourceGroup { .. } => EXIT_RESOURCE_GROUP,
            LauncherError::Launch { .. } => EXIT_LAUNCH,
            LauncherError::ScriptDir(_)
            | LauncherError::NonUtf8Path(_)
            | LauncherError::Render(_)
            | LauncherError::Output(_) => EXIT_FAILURE,
        }
    }
}
