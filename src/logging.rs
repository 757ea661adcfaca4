// ==========================================
// Logging setup
// ==========================================
// Filter: LOT_COST_LOG, then RUST_LOG, then info
// Logs always go to stderr, report JSON owns stdout
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

pub const LOG_ENV: &str = "LOT_COST_LOG";
const DEFAULT_DIRECTIVES: &str = "info";

/// Subscriber output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, with the current span attached
    Json,
}

impl LogFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Pick the filter directives; the engine-specific variable wins over RUST_LOG.
/// Blank values are ignored.
fn select_directives(lot_cost_log: Option<String>, rust_log: Option<String>) -> String {
    [lot_cost_log, rust_log]
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string())
}

fn build_filter() -> EnvFilter {
    let directives = select_directives(
        std::env::var(LOG_ENV).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );
    // an unparsable filter falls back to info rather than aborting the command
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the global subscriber.
///
/// # Example
/// ```no_run
/// use lot_cost_engine::logging::{self, LogFormat};
/// logging::init(LogFormat::Text);
/// ```
pub fn init(format: LogFormat) {
    let builder = fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr);

    // try_init: a second call keeps the first subscriber
    let _ = match format {
        LogFormat::Text => builder
            .with_target(true)
            .with_line_number(true)
            .try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
}
