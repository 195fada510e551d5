//! Binary entrypoint for the SDT API server.
use sdt_api::{run, ServiceConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Listen address and request defaults can be overridden with SDT_* variables
    let config = ServiceConfig::from_env()?;
    run(config).await
}
