use async_trait::async_trait;

use crate::errors::AppError;

pub mod cloudinary;

/// A file received from a client, held in memory until uploaded.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct MediaAsset {
    pub url: String,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, file: Upload) -> Result<MediaAsset, AppError>;
}
