//! Logging setup for the FinStocks binaries.
//!
//! The configured level applies to the `finstocks_*` crates. Everything else
//! defaults to `warn`. Connection logs from reqwest, used by the hosted
//! backend, only show up at `trace`. `RUST_LOG` replaces the whole filter.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Crates whose events follow the configured level.
pub const FINSTOCKS_TARGETS: &[&str] = &["finstocks_api", "finstocks_seed", "finstocks_common"];

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `json` (any case) selects JSON lines; anything else is pretty.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Filter directives for the given observability settings.
///
/// The request trace layer logs at `debug`, so tower-http follows the
/// configured level only at `debug` or `trace`.
pub fn filter_directives(config: &ObservabilityConfig) -> String {
    let level = config.log_level.trim().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];

    for target in FINSTOCKS_TARGETS {
        directives.push(format!("{}={}", target, level));
    }
    if matches!(level.as_str(), "debug" | "trace") {
        directives.push(format!("tower_http={}", level));
    }
    if level == "trace" {
        directives.push("reqwest=debug".to_string());
    }

    directives.join(",")
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));
    let subscriber = tracing_subscriber::registry().with(filter);
    let format = LogFormat::parse(&config.log_format);

    match format {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            let _ = subscriber.with(fmt_layer).try_init();
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false);
            let _ = subscriber.with(fmt_layer).try_init();
        }
    }

    tracing::debug!(
        log_level = %config.log_level,
        format = ?format,
        "Logging initialized"
    );
}
