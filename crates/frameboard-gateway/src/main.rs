//! Frameboard gateway: stores the dashboard layout as one JSON document and
//! lists the carousel images. Bare metal, single process.

mod config;
mod routes;

use std::sync::Arc;

use frameboard_core::{JsonFileStore, LayoutConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::GatewayConfig;
use crate::routes::{build_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = GatewayConfig::load()?;
    let layout = LayoutConfig::load(None)?;

    let state = Arc::new(AppState {
        store: JsonFileStore::new(&cfg.data_file),
        image_dir: cfg.image_dir.clone(),
        layout,
    });

    let app = build_app(state);
    let addr = cfg.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        data_file = %cfg.data_file.display(),
        image_dir = %cfg.image_dir.display(),
        version = frameboard_core::version(),
        "frameboard gateway listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
