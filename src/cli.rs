//! Command-line interface

use std::path::{Component, Path, PathBuf};

use clap::{ArgAction, Parser};

/// Launch nested vm for testing guest
#[derive(Parser, Debug, Clone)]
#[command(name = "nested-run", version, about)]
pub struct LaunchArgs {
    /// Add vhost-scsi device instead of vhost-nvme
    #[arg(short = 's', long = "vhost-scsi")]
    pub vhost_scsi: bool,

    /// Do not launch, only print the command
    #[arg(long)]
    pub dry_run: bool,

    /// Run in a memory cgroup
    #[arg(short = 'c', long, value_name = "NAME", value_parser = parse_cgroup_name)]
    pub cgroup: Option<String>,

    /// Directory holding qemu/, linux/ and alpine.qcow2 (defaults to the executable's directory)
    #[arg(long, value_name = "DIR", env = "NESTED_RUN_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

/// Accept only names that stay under the cgroup root
fn parse_cgroup_name(name: &str) -> Result<String, String> {
    if name.is_empty() {
        return Err("cgroup name must not be empty".to_string());
    }

    let valid = Path::new(name)
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !valid {
        return Err(format!(
            "cgroup name '{}' must be a relative path without '.' or '..'",
            name
        ));
    }

    Ok(name.to_string())
}
