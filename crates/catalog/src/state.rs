use std::sync::Arc;

use sqlx::SqlitePool;

use crate::{auth::JwtService, config::CatalogServerConfig, graphql::CatalogSchema};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: CatalogServerConfig,
    pub jwt: Arc<JwtService>,
    schema: CatalogSchema,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        config: CatalogServerConfig,
        jwt: Arc<JwtService>,
        schema: CatalogSchema,
    ) -> Self {
        Self {
            pool,
            config,
            jwt,
            schema,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn config(&self) -> &CatalogServerConfig {
        &self.config
    }

    pub fn jwt(&self) -> Arc<JwtService> {
        Arc::clone(&self.jwt)
    }

    pub fn schema(&self) -> &CatalogSchema {
        &self.schema
    }
}
