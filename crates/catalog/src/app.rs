use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;

use crate::{
    AppState,
    auth::JwtService,
    config::CatalogServerConfig,
    db,
    graphql::build_schema,
    routes,
};

pub struct Server;

impl Server {
    /// Connects to the database, applies migrations and serves until ctrl-c.
    pub async fn run(config: CatalogServerConfig) -> anyhow::Result<()> {
        let pool = db::create_pool(&config.database_url, config.max_connections)
            .await
            .context("failed to connect to database")?;

        db::run_migrations(&pool)
            .await
            .context("failed to run database migrations")?;

        let jwt = Arc::new(JwtService::new(&config.auth).context("invalid JWT secret")?);
        let schema = build_schema(pool.clone());
        let listen_addr = config.listen_addr.clone();
        let state = AppState::new(pool.clone(), config, jwt, schema);

        let listener = TcpListener::bind(&listen_addr)
            .await
            .with_context(|| format!("failed to bind {listen_addr}"))?;
        tracing::info!(%listen_addr, "catalog server listening");

        axum::serve(listener, routes::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        pool.close().await;
        tracing::info!("catalog server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(?error, "failed to install ctrl-c handler");
    }
}
