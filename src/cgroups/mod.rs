//! Memory cgroup membership
//!
//! Places the launcher into a named cgroup v1 memory group before the
//! hypervisor is spawned. The group is joined, never limited and never
//! removed: limits, if any, are configured on the host out of band.
//!
//! # Example Usage
//!
//! ```ignore
//! use nested_run::cgroups::CgroupManager;
//!
//! let cgroups = CgroupManager::new();
//! cgroups.join("bench", std::process::id())?;
//! ```

pub mod manager;

pub use manager::{CgroupManager, MEMORY_CGROUP_ROOT};
