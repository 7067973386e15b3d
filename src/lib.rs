//! nested-run - launcher for a nested QEMU guest used in guest-side testing
//!
//! Builds a fixed QEMU invocation from paths relative to the launcher's own
//! directory, optionally joins a memory cgroup first, then runs the
//! hypervisor in the foreground and propagates its exit status.
//!
//! # Modules
//!
//! - `cli` - Command-line arguments
//! - `cgroups` - Memory cgroup membership
//! - `vm` - Guest configuration, QEMU command building, process spawning
//! - `launcher` - The launch sequence
//! - `error` - Error taxonomy and exit codes
//! - `tracing` - Structured logging setup
//!
//! # Quick Start
//!
//! ```ignore
//! use clap::Parser;
//! use nested_run::{LaunchArgs, LaunchConfig, Launcher};
//!
//! let args = LaunchArgs::parse();
//! let config = LaunchConfig::from_args(&args)?;
//! let code = Launcher::new().run(&config, &mut std::io::stdout())?;
//! ```

pub mod cgroups;
pub mod cli;
pub mod error;
pub mod launcher;
pub mod tracing;
pub mod vm;

// Re-export commonly used types at crate root for convenience
pub use cli::LaunchArgs;
pub use error::LauncherError;
pub use launcher::Launcher;
pub use vm::{LaunchConfig, QemuCommand};
