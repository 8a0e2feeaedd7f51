//! Storefront - demo storefront server

use std::sync::Arc;

use anyhow::Result;
use storefront::{http, load_catalog, AcknowledgingSubmitter, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = StorefrontConfig::from_env()?;
    let catalog = load_catalog(&config)?;
    let state = http::AppState::new(catalog, config.fees.clone(), Arc::new(AcknowledgingSubmitter::new()), config.max_sessions);
    let app = http::router(state);

    tracing::info!(courier_fee = %config.fees.courier, post_fee = %config.fees.post, "delivery fees");
    tracing::info!("Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
