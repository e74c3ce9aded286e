//! Logging setup for Quarry.
//!
//! Quarry logs through `tracing`: pool creation, every SQL statement and its
//! row count at `info`, connection borrows and default resolution at
//! `debug`, mutation-count mismatches at `warn`. Statements use the
//! `quarry::sql` target.
//!
//! # Environment Variables
//!
//! - `QUARRY_DEBUG=true|1|yes` - Enable debug logging
//! - `QUARRY_LOG_LEVEL=trace|debug|info|warn|error` - Set the log level
//! - `QUARRY_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use quarry_query::logging;
//!
//! // Call once at startup. Needs the `tracing-subscriber` feature.
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if `QUARRY_DEBUG` is set to "true", "1" or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("QUARRY_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the log level from `QUARRY_LOG_LEVEL`.
///
/// Falls back to "debug" when `QUARRY_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("QUARRY_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the output format from `QUARRY_LOG_FORMAT`. Defaults to "json".
pub fn get_log_format() -> &'static str {
    env::var("QUARRY_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Install a global `tracing` subscriber for the Quarry crates.
///
/// Does nothing unless `QUARRY_DEBUG` or `QUARRY_LOG_LEVEL` is set, or when
/// the `tracing-subscriber` feature is off. Subsequent calls are no-ops.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("QUARRY_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = get_log_level();
            let filter = EnvFilter::try_new(format!(
                "quarry={level},quarry_query={level},quarry_schema={level},quarry_mysql={level},quarry_sqlite={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            // Another subscriber may already be installed by the application.
            let installed = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "Quarry logging initialized"
                );
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // SAFETY: no other test in this crate touches these variables.
        unsafe {
            env::remove_var("QUARRY_DEBUG");
            env::remove_var("QUARRY_LOG_LEVEL");
            env::remove_var("QUARRY_LOG_FORMAT");
        }
        assert!(!is_debug_enabled());
        assert_eq!(get_log_level(), "warn");
        assert_eq!(get_log_format(), "json");
    }
}
