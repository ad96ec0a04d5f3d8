use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;
use crate::storage::LocalStore;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub store: Arc<LocalStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let store = Arc::new(LocalStore::new(
            config.upload_dir.clone(),
            config.public_base_url.clone(),
        ));

        Ok(Self { db, config, store })
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>, store: Arc<LocalStore>) -> Self {
        Self { db, config, store }
    }
}
