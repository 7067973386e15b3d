//! Launch sequence
//!
//! One `run` per process:
//!
//! ```text
//! print pid ─► join cgroup? ─► build command ─► print command
//!                                                   │
//!                                  dry run? ─yes─► exit 0
//!                                                   │ no
//!                                  spawn + wait ─► print farewell ─► child's code
//! ```

use std::io::Write;

use crate::cgroups::CgroupManager;
use crate::error::LauncherError;
use crate::vm::{ForegroundSpawner, LaunchConfig, QemuCommand, Spawner};

pub const LAUNCH_BANNER: &str = "launching:";
pub const FAREWELL_BANNER: &str = "~~~ Goodbye ~~~";

/// Drives a single launch
///
/// # Example
///
/// ```ignore
/// let config = LaunchConfig::from_args(&args)?;
/// let code = Launcher::new().run(&config, &mut std::io::stdout())?;
/// std::process::exit(code);
/// ```
pub struct Launcher<S: Spawner = ForegroundSpawner> {
    cgroups: CgroupManager,
    spawner: S,
}

impl Launcher<ForegroundSpawner> {
    /// Launcher using the host memory cgroup root and a foreground spawner
    pub fn new() -> Self {
        Self::with_parts(CgroupManager::new(), ForegroundSpawner)
    }
}

impl Default for Launcher<ForegroundSpawner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Spawner> Launcher<S> {
    pub fn with_parts(cgroups: CgroupManager, spawner: S) -> Self {
        Self { cgroups, spawner }
    }

    /// Run the launch sequence, writing operator output to `out`
    ///
    /// Returns the exit code the process should terminate with: 0 for a dry
    /// run, otherwise the hypervisor's own exit code.
    pub fn run<W: Write>(&mut self, config: &LaunchConfig, out: &mut W) -> Result<i32, LauncherError> {
        writeln!(out, "my pid is {}", config.process_id).map_err(LauncherError::Output)?;

        if let Some(name) = &config.cgroup_name {
            self.cgroups.join(name, config.process_id)?;
        }

        let command = QemuCommand::nested_guest(&config.guest_paths(), config.passthrough());
        let rendered = command.render()?;

        writeln!(out, "{}\n{}", LAUNCH_BANNER, rendered).map_err(LauncherError::Output)?;
        // The child shares our stdout; everything above must land first
        out.flush().map_err(LauncherError::Output)?;

        if config.dry_run {
            tracing::info!("dry run, hypervisor not started");
            return Ok(0);
        }

        let exit = self
            .spawner
            .spawn_and_wait(&command)
            .map_err(|source| LauncherError::Launch {
                program: command.program().to_string(),
                source,
            })?;

        let code = exit.exit_code();
        if exit.success() {
            tracing::info!(code, "hypervisor exited");
        } else {
            tracing::warn!(code, signal = exit.signal_name(), "hypervisor exited");
        }

        writeln!(out, "{}", FAREWELL_BANNER).map_err(LauncherError::Output)?;
        out.flush().map_err(LauncherError::Output)?;

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::ChildExit;
    use std::io;

    struct FixedExit(ChildExit, usize);

    impl Spawner for FixedExit {
        fn spawn_and_wait(&mut self, _command: &QemuCommand) -> io::Result<ChildExit> {
            self.1 += 1;
            Ok(self.0)
        }
    }

    struct NotFound;

    impl Spawner for NotFound {
        fn spawn_and_wait(&mut self, _command: &QemuCommand) -> io::Result<ChildExit> {
            Err(io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn config(dry_run: bool) -> LaunchConfig {
        LaunchConfig {
            use_vhost_scsi: false,
            dry_run,
            cgroup_name: None,
            script_dir: "/opt/nested".to_string(),
            process_id: 1234,
        }
    }

    fn launcher<S: Spawner>(spawner: S) -> Launcher<S> {
        Launcher::with_parts(CgroupManager::with_root("/nonexistent/cgroup/root"), spawner)
    }

    #[test]
    fn test_dry_run_never_spawns() {
        let mut launcher = launcher(FixedExit(ChildExit::Code(9), 0));
        let mut out = Vec::new();

        let code = launcher.run(&config(true), &mut out).unwrap();

        assert_eq!(code, 0);
        assert_eq!(launcher.spawner.1, 0);
        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("my pid is 1234\nlaunching:\n"));
        assert!(!out.contains(FAREWELL_BANNER));
    }

    #[test]
    fn test_child_exit_code_is_propagated() {
        let mut launcher = launcher(FixedExit(ChildExit::Code(3), 0));
        let mut out = Vec::new();

        let code = launcher.run(&config(false), &mut out).unwrap();

        assert_eq!(code, 3);
        assert_eq!(launcher.spawner.1, 1);
        assert!(String::from_utf8(out).unwrap().ends_with("~~~ Goodbye ~~~\n"));
    }

    #[test]
    fn test_spawn_failure_is_launch_error() {
        let mut launcher = launcher(NotFound);
        let mut out = Vec::new();

        let err = launcher.run(&config(false), &mut out).unwrap_err();

        assert!(matches!(err, LauncherError::Launch { .. }));
        assert_eq!(err.exit_code(), crate::error::EXIT_LAUNCH);
        assert!(err.to_string().contains("/opt/nested/qemu/build/qemu-system-x86_64"));
        assert!(!String::from_utf8(out).unwrap().contains(FAREWELL_BANNER));
    }

    #[test]
    fn test_cgroup_failure_stops_before_spawn() {
        let mut launcher = launcher(FixedExit(ChildExit::Code(0), 0));
        let mut cfg = config(false);
        cfg.cgroup_name = Some("bench".to_string());
        let mut out = Vec::new();

        let err = launcher.run(&cfg, &mut out).unwrap_err();

        assert_eq!(err.exit_code(), crate::error::EXIT_RESOURCE_GROUP);
        assert_eq!(launcher.spawner.1, 0);
        assert!(!String::from_utf8(out).unwrap().contains(LAUNCH_BANNER));
    }
}
