//! Logging setup for the `kiva` binary.
//!
//! Logs go to stderr so stdout carries only the JSON records.

use std::io;

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Log format configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format for interactive use.
    Pretty,
    /// JSON format for log aggregation.
    Json,
}

impl LogFormat {
    /// Determines log format from environment.
    ///
    /// Checks `LOG_FORMAT` environment variable:
    /// - `json` => JSON format
    /// - `pretty` or unset => Pretty format
    #[must_use]
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("LOG_FORMAT").unwrap_or_default())
    }

    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` selects levels and defaults to `warn`, keeping normal runs quiet; set
/// `RUST_LOG=kiva_client=debug` to see every request and skipped field.
pub fn init_observability(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => {
            subscriber
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(false)
                        .with_thread_names(false)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
        LogFormat::Json => {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_writer(io::stderr),
                )
                .init();
        }
    }
}
