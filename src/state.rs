use std::sync::Arc;

use sqlx::MySqlPool;
use tokio::fs;

use super::{config::Config, database::init_mysql};

pub struct State {
    pub config: Config,
    pub pool: MySqlPool,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let pool = init_mysql(&config).await;

        fs::create_dir_all(&config.upload_dir)
            .await
            .expect("Failed to create upload directory");

        Arc::new(Self { config, pool })
    }
}
