use std::process::ExitCode;

use clap::Parser;

use nested_run::{LaunchArgs, LaunchConfig, Launcher, LauncherError};

fn main() -> ExitCode {
    // Usage errors exit with code 2 here, before any side effect
    let args = LaunchArgs::parse();

    if let Err(e) = nested_run::tracing::init_tracing(args.verbose, args.log_json) {
        eprintln!("[WARN] Failed to initialize logging: {}", e);
    }

    match launch(&args) {
        Ok(code) => exit_code(code),
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            exit_code(e.exit_code())
        }
    }
}

fn launch(args: &LaunchArgs) -> Result<i32, LauncherError> {
    let config = LaunchConfig::from_args(args)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    Launcher::new().run(&config, &mut out)
}

/// Exit statuses are a single byte; out-of-range values are clamped to failure
fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
