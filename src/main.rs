//! matchdesk - football match analysis in the terminal.

use anyhow::Context;
use matchdesk::{App, Config, config};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log to a daily file; the terminal belongs to the UI.
fn init_logging() -> anyhow::Result<WorkerGuard> {
    let log_dir = config::log_dir().context("resolving the log directory")?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "matchdesk.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "matchdesk=info".into()))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = init_logging()?;

    let config = Config::load_or_default().context("loading configuration")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting matchdesk");

    let mut app = App::new(config).context("starting the terminal UI")?;
    app.run().await?;

    Ok(())
}
