//! Tracing/logging initialization.
//!
//! `RUST_LOG` controls filtering (default: `info`, with sqlx statement logs
//! at `warn`). `LOG_FORMAT=pretty` switches from JSON lines to the
//! human-readable formatter for local runs.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,sqlx=warn";

/// Output format for log lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// Anything other than `pretty` (case-insensitive) means JSON.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let format = LogFormat::parse(std::env::var("LOG_FORMAT").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pretty_selects_pretty() {
        assert_eq!(LogFormat::parse(Some("PRETTY")), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::parse(None), LogFormat::Json);
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
    }
}
