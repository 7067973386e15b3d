//! QEMU invocation
//!
//! Assembles the hypervisor argument vector in a fixed order so that the
//! printed command line is stable and diffable between runs.

use std::process::Command;

use super::config::*;

/// A fully assembled hypervisor invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QemuCommand {
    program: String,
    args: Vec<String>,
}

impl QemuCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Command for the nested test guest
    ///
    /// Order: display, acceleration, memory, cpu, smp, nic, netdev, kernel
    /// command line, kernel, root disk, then the pass-through device.
    pub fn nested_guest(paths: &GuestPaths, device: PassthroughDevice) -> Self {
        let args = vec![
            "-nographic".to_string(),
            "-enable-kvm".to_string(),
            "-m".to_string(),
            MEMORY_MIB.to_string(),
            "-cpu".to_string(),
            CPU_MODEL.to_string(),
            "-smp".to_string(),
            VCPUS.to_string(),
            "-device".to_string(),
            NIC_DEVICE.to_string(),
            "-netdev".to_string(),
            NETDEV.to_string(),
            "-append".to_string(),
            KERNEL_CMDLINE.to_string(),
            "-kernel".to_string(),
            paths.kernel_image.clone(),
            "-drive".to_string(),
            format!("file={},if=virtio", paths.disk_image),
            "-device".to_string(),
            device.device_arg().to_string(),
        ];
        Self::new(&paths.qemu_bin, args)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    /// Single POSIX-shell-quoted line that parses back to `argv()`
    pub fn render(&self) -> Result<String, shlex::QuoteError> {
        shlex::try_join(self.argv())
    }

    /// `std::process::Command` spawning exactly `argv()`
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}
