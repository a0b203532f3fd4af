use anyhow::Result;
use tms::commands::Cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    Cli::menu()
}

/// Warnings only by default; `RUST_LOG` overrides, `TMS_DEBUG` turns on debug output.
fn init_tracing() {
    let default_level = if std::env::var("TMS_DEBUG").is_ok() { "tms=debug" } else { "warn" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
