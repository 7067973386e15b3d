//! Nested guest VM configuration
//!
//! Fixed hypervisor settings, the file layout relative to the launcher
//! directory, and the per-invocation `LaunchConfig`.

use std::path::{Path, PathBuf};

use crate::cli::LaunchArgs;
use crate::error::LauncherError;

pub const MEMORY_MIB: u32 = 1024;
pub const CPU_MODEL: &str = "host";
pub const VCPUS: u32 = 2;
pub const NIC_DEVICE: &str = "e1000,netdev=net0";
/// User-mode networking, host TCP 5551 forwarded to guest SSH
pub const NETDEV: &str = "user,id=net0,hostfwd=tcp::5551-:22";
pub const KERNEL_CMDLINE: &str = "console=ttyS0 root=/dev/vda3";

pub const VHOST_SCSI_DEVICE: &str = "vhost-scsi-pci,wwpn=naa.000000000000000b,bus=pci.0,addr=0x6";
pub const VHOST_NVME_DEVICE: &str = "vhost-kernel-nvme,bus=pci.0,addr=0x5,serial=deadbeaf";

const QEMU_BIN: &str = "qemu/build/qemu-system-x86_64";
const KERNEL_IMAGE: &str = "linux/arch/x86_64/boot/bzImage";
const DISK_IMAGE: &str = "alpine.qcow2";

/// Storage pass-through device exposed to the guest
///
/// Exactly one is attached to every launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassthroughDevice {
    VhostScsi,
    VhostNvme,
}

impl PassthroughDevice {
    pub fn from_flag(use_vhost_scsi: bool) -> Self {
        if use_vhost_scsi {
            PassthroughDevice::VhostScsi
        } else {
            PassthroughDevice::VhostNvme
        }
    }

    /// Value passed to `-device`
    pub fn device_arg(self) -> &'static str {
        match self {
            PassthroughDevice::VhostScsi => VHOST_SCSI_DEVICE,
            PassthroughDevice::VhostNvme => VHOST_NVME_DEVICE,
        }
    }
}

/// Hypervisor, kernel and disk locations under the launcher directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestPaths {
    pub qemu_bin: String,
    pub kernel_image: String,
    pub disk_image: String,
}

impl GuestPaths {
    pub fn under(script_dir: &str) -> Self {
        Self {
            qemu_bin: format!("{script_dir}/{QEMU_BIN}"),
            kernel_image: format!("{script_dir}/{KERNEL_IMAGE}"),
            disk_image: format!("{script_dir}/{DISK_IMAGE}"),
        }
    }
}

/// Everything one launch needs, captured once at startup
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub use_vhost_scsi: bool,
    pub dry_run: bool,
    pub cgroup_name: Option<String>,
    /// Base for every referenced path
    pub script_dir: String,
    /// PID of the launcher itself, written to the cgroup `tasks` file
    pub process_id: u32,
}

impl LaunchConfig {
    /// Build the configuration from parsed arguments
    ///
    /// `script_dir` comes from `--base-dir` when given, otherwise from the
    /// canonical location of the running executable.
    pub fn from_args(args: &LaunchArgs) -> Result<Self, LauncherError> {
        let script_dir = match &args.base_dir {
            Some(dir) => path_to_string(dir)?,
            None => current_exe_dir()?,
        };

        Ok(Self {
            use_vhost_scsi: args.vhost_scsi,
            dry_run: args.dry_run,
            cgroup_name: args.cgroup.clone(),
            script_dir,
            process_id: std::process::id(),
        })
    }

    pub fn passthrough(&self) -> PassthroughDevice {
        PassthroughDevice::from_flag(self.use_vhost_scsi)
    }

    pub fn guest_paths(&self) -> GuestPaths {
        GuestPaths::under(&self.script_dir)
    }
}

/// Directory holding the launcher binary, symlinks resolved
fn current_exe_dir() -> Result<String, LauncherError> {
    let exe = std::env::current_exe()
        .and_then(|p| p.canonicalize())
        .map_err(LauncherError::ScriptDir)?;
    let dir = exe.parent().unwrap_or_else(|| Path::new("/"));
    path_to_string(dir)
}

fn path_to_string(path: &Path) -> Result<String, LauncherError> {
    path.to_str()
        .map(|s| s.trim_end_matches('/').to_string())
        .map(|s| if s.is_empty() { "/".to_string() } else { s })
        .ok_or_else(|| LauncherError::NonUtf8Path(PathBuf::from(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_from_flag() {
        assert_eq!(PassthroughDevice::from_flag(true), PassthroughDevice::VhostScsi);
        assert_eq!(PassthroughDevice::from_flag(false), PassthroughDevice::VhostNvme);
        assert_ne!(
            PassthroughDevice::VhostScsi.device_arg(),
            PassthroughDevice::VhostNvme.device_arg()
        );
    }

    #[test]
    fn test_guest_paths_are_joined_onto_script_dir() {
        let paths = GuestPaths::under("/opt/nested");
        assert_eq!(paths.qemu_bin, "/opt/nested/qemu/build/qemu-system-x86_64");
        assert_eq!(paths.kernel_image, "/opt/nested/linux/arch/x86_64/boot/bzImage");
        assert_eq!(paths.disk_image, "/opt/nested/alpine.qcow2");
    }

    #[test]
    fn test_path_to_string_strips_trailing_slash() {
        assert_eq!(path_to_string(Path::new("/opt/nested/")).unwrap(), "/opt/nested");
        assert_eq!(path_to_string(Path::new("/")).unwrap(), "/");
    }

    #[test]
    fn test_current_exe_dir_is_absolute() {
        let dir = current_exe_dir().unwrap();
        assert!(Path::new(&dir).is_absolute());
        assert!(Path::new(&dir).is_dir());
    }
}
