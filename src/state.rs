use std::sync::Arc;

use crate::{
    auth::jwt::TokenService,
    config::Config,
    media::{cloudinary::CloudinaryStore, MediaStore},
    store::{mongo::MongoAccountStore, AccountStore},
};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub tokens: TokenService,
    pub store: Arc<dyn AccountStore>,
    pub media: Arc<dyn MediaStore>,
}

impl AppState {
    pub async fn new(cfg: Config) -> mongodb::error::Result<Self> {
        let store = MongoAccountStore::connect(&cfg).await?;
        let media = CloudinaryStore::new(cfg.cloudinary.clone());
        Ok(Self::from_parts(cfg, Arc::new(store), Arc::new(media)))
    }

    pub fn from_parts(
        cfg: Config,
        store: Arc<dyn AccountStore>,
        media: Arc<dyn MediaStore>,
    ) -> Self {
        Self {
            tokens: TokenService::new(&cfg),
            cfg: Arc::new(cfg),
            store,
            media,
        }
    }
}
