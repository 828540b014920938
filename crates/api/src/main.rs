use std::sync::Arc;

use anyhow::Context;

use technia_api::app::{build_app, services::build_services};
use technia_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    technia_observability::init(config.log_format);

    let services = Arc::new(build_services(&config).await?);
    let app = build_app(services, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
