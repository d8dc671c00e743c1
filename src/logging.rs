//! Logging setup.
//!
//! Compact timestamped output via `tracing`, quiet by default.
//! `RUST_LOG` overrides the configured level at runtime:
//!
//! ```bash
//! RUST_LOG=debug codegraph ./project
//! RUST_LOG=codegraph::resolve=trace codegraph ./project
//! ```

use std::sync::Once;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Compact time format: HH:MM:SS.mmm
struct CompactTime;

impl FormatTime for CompactTime {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Initialize logging. Safe to call multiple times; only the first call
/// takes effect. `RUST_LOG` takes precedence over `default_level`.
pub fn init(default_level: &str) {
    let level = default_level.to_string();
    INIT.call_once(move || {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(&level)
        };

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_timer(CompactTime)
            .with_level(true)
            .with_writer(std::io::stderr)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}
