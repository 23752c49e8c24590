use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    storage::ImageStore,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub images: Arc<ImageStore>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(pool.clone());
        let images = ImageStore::new(&config.upload_dir, &config.public_base_url);
        Self {
            pool,
            orm,
            config: Arc::new(config),
            images: Arc::new(images),
        }
    }
}
