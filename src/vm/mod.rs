//! Nested guest VM launch
//!
//! This module provides:
//! - Fixed guest configuration and launch parameters
//! - QEMU argument vector and its rendering
//! - Hypervisor process spawning

pub mod config;
pub mod lifecycle;
pub mod qemu;

pub use config::*;
pub use lifecycle::{ChildExit, ForegroundSpawner, Spawner};
pub use qemu::QemuCommand;
