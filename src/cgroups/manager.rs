//! Memory cgroup membership for the launcher process
//!
//! The launcher joins a cgroup v1 memory group before it spawns the
//! hypervisor, so the hypervisor inherits the membership on fork.
//!
//! # How cgroup v1 Membership Works
//!
//! ```text
//! /sys/fs/cgroup/memory/              ← memory controller hierarchy
//! └── {name}/                         ← mkdir creates the group
//!     ├── memory.limit_in_bytes       ← created by the kernel, never written here
//!     └── tasks                       ← PIDs in this group
//! ```
//!
//! Writing a PID to `tasks` moves that task into the group. Children forked
//! afterwards start in the same group.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::LauncherError;

/// Root of the cgroup v1 memory controller hierarchy
pub const MEMORY_CGROUP_ROOT: &str = "/sys/fs/cgroup/memory";

/// Membership file inside a group directory
const TASKS_FILE: &str = "tasks";

/// Joins processes to named memory cgroups
///
/// # Example
///
/// ```ignore
/// let cgroups = CgroupManager::new();
///
/// // Creates /sys/fs/cgroup/memory/bench if needed, then writes our PID
/// cgroups.join("bench", std::process::id())?;
/// ```
#[derive(Debug, Clone)]
pub struct CgroupManager {
    /// Base path: /sys/fs/cgroup/memory
    base_path: PathBuf,
}

impl Default for CgroupManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CgroupManager {
    /// Manager rooted at the host memory controller
    pub fn new() -> Self {
        Self::with_root(MEMORY_CGROUP_ROOT)
    }

    /// Manager rooted at an arbitrary directory
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            base_path: root.into(),
        }
    }

    /// Get the path to a group's directory
    pub fn group_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Check if a group exists
    pub fn exists(&self, name: &str) -> bool {
        self.group_path(name).exists()
    }

    /// Create the group directory unless it is already there
    ///
    /// Uses a single `mkdir` (not `mkdir -p`): a missing parent is an error,
    /// the same way the kernel would refuse it for a missing parent group.
    ///
    /// Returns `true` if the directory was created by this call.
    pub fn ensure_group(&self, name: &str) -> io::Result<bool> {
        if self.exists(name) {
            return Ok(false);
        }

        fs::create_dir(self.group_path(name))?;
        Ok(true)
    }

    /// Add a process to a group
    ///
    /// Writes the decimal PID, without a trailing newline, to `tasks`.
    pub fn add_task(&self, name: &str, pid: u32) -> io::Result<()> {
        let tasks_file = self.group_path(name).join(TASKS_FILE);
        fs::write(tasks_file, pid.to_string())
    }

    /// Create the group if needed and move `pid` into it
    ///
    /// Neither step is retried. A failure here must stop the launch, since a
    /// benchmark running outside its group would silently skew results.
    pub fn join(&self, name: &str, pid: u32) -> Result<PathBuf, LauncherError> {
        let cgroup_path = self.group_path(name);

        // SAFETY: geteuid has no preconditions and cannot fail
        let euid = unsafe { libc::geteuid() };
        if euid != 0 {
            tracing::warn!(euid, "not running as root, cgroup operations may fail");
        }

        let created = self
            .ensure_group(name)
            .map_err(|source| LauncherError::ResourceGroup {
                path: cgroup_path.clone(),
                source,
            })?;
        if created {
            tracing::info!(path = %cgroup_path.display(), "created memory cgroup");
        }

        self.add_task(name, pid)
            .map_err(|source| LauncherError::ResourceGroup {
                path: cgroup_path.join(TASKS_FILE),
                source,
            })?;
        tracing::info!(pid, group = name, "joined memory cgroup");

        Ok(cgroup_path)
    }
}
