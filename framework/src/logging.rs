//! Logging bootstrap.
//!
//! Attaches the console tracing sink with a default level taken from the
//! `Logging:LogLevel:Default` configuration key. `RUST_LOG` always wins so
//! operators can raise verbosity without touching settings files.

use crate::config::Configuration;
use tracing_subscriber::EnvFilter;

/// Initialize tracing for the process. Safe to call more than once;
/// subsequent calls are no-ops.
pub fn init(config: &Configuration) {
    let default_level = config
        .get("Logging:LogLevel:Default")
        .map(|level| normalize_level(&level))
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Map settings-file level names onto tracing filter directives.
fn normalize_level(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "information" | "info" => "info",
        "warning" | "warn" => "warn",
        "error" | "critical" => "error",
        "none" => "off",
        _ => "info",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn settings_level_names_normalize() {
        assert_eq!(normalize_level("Information"), "info");
        assert_eq!(normalize_level("Warning"), "warn");
        assert_eq!(normalize_level("Critical"), "error");
        assert_eq!(normalize_level("None"), "off");
        assert_eq!(normalize_level("bogus"), "info");
    }
}
