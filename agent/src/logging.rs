use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Crates whose spans and events are shown at the configured level.
const LOGGED_CRATES: [&str; 3] = ["agent_runtime", "agent_work_host", "agent_reward"];

/// Build the filter: `RUST_LOG` wins, otherwise `level` for our own crates.
pub fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(directives) = std::env::var("RUST_LOG") {
        return Ok(EnvFilter::new(directives));
    }

    let mut filter = EnvFilter::new("warn");
    for krate in LOGGED_CRATES {
        filter = filter.add_directive(format!("{krate}={level}").parse()?);
    }
    Ok(filter)
}

/// Initialize the global subscriber. Logs go to stderr so stdout stays
/// machine readable.
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = env_filter(level)?;
    let show_location = matches!(level, "debug" | "trace");

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(show_location)
        .with_line_number(show_location)
        .with_file(show_location);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}
