//! Structured logging
//!
//! Logs go to stderr. Stdout is reserved for the operator banners, the
//! printed command line and the guest serial console.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set
pub fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info,nested_run=info",
        2 => "info,nested_run=debug",
        _ => "trace",
    }
}

/// Initialize the tracing subsystem
///
/// # Arguments
/// * `verbose` - Number of `-v` flags given on the command line
/// * `json` - Emit one JSON object per event instead of text
///
/// `RUST_LOG` takes precedence over `verbose` when set.
pub fn init_tracing(verbose: u8, json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let fmt_layer = if json {
        fmt_layer.json().boxed()
    } else {
        fmt_layer.boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::debug!(verbose, json, "tracing initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(default_filter(0), "warn");
        assert!(default_filter(2).contains("nested_run=debug"));
        assert_eq!(default_filter(9), "trace");
    }

    #[test]
    fn test_default_filters_parse() {
        for verbose in 0..4 {
            assert!(EnvFilter::try_new(default_filter(verbose)).is_ok());
        }
    }
}
