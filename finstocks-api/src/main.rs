//! finstocks-api service entry point.

use anyhow::Result;
use finstocks_api::{connect, ApiService};
use finstocks_common::{init_logging, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Config::load_with_env()?;
    init_logging(&config.observability);

    tracing::info!("FinStocks API v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e);
    }

    let store = connect(&config.database)?;
    let service = ApiService::new(config, store);

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    service.start().await
}
