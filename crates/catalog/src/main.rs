use catalog::{Server, config::CatalogServerConfig, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = CatalogServerConfig::from_env()?;
    Server::run(config).await
}
