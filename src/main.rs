use portal::config::AppConfig;
use portal::server::ServerBuilder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "ngo_portal=info,portal=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        bind = %config.server.bind,
        storage = %config.storage.backend,
        "starting NGO portal"
    );

    ServerBuilder::new(config)
        .connect_storage()
        .await?
        .serve()
        .await
}
