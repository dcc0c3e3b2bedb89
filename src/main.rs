use std::sync::Arc;

use genre_recs::{
    api::{create_router, AppState},
    config::Config,
    services::JsonFileStore,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("genre_recs=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let catalog = config.load_catalog()?;
    let store = Arc::new(JsonFileStore::new(config.profiles_dir.clone()));

    tracing::info!(
        profiles_dir = %config.profiles_dir.display(),
        top_n = config.top_n,
        top_k = config.top_k,
        "Configuration loaded"
    );

    let state = AppState::with_parts(catalog, store, config.recommend_options());
    let app = create_router(state).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
