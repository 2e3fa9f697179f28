use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::{
    auth::tokens::sha256_hex,
    config::CloudinaryConfig,
    errors::AppError,
    media::{MediaAsset, MediaStore, Upload},
};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
    error: Option<UploadError>,
}

#[derive(Debug, Deserialize)]
struct UploadError {
    message: String,
}

/// Signed uploads to Cloudinary; `None` config makes every upload fail.
#[derive(Clone)]
pub struct CloudinaryStore {
    http: reqwest::Client,
    cfg: Option<CloudinaryConfig>,
}

impl CloudinaryStore {
    pub fn new(cfg: Option<CloudinaryConfig>) -> Self {
        if cfg.is_none() {
            tracing::warn!("cloudinary is not configured, media uploads will fail");
        }
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }
}

fn signature(timestamp: i64, api_secret: &str) -> String {
    sha256_hex(&format!("timestamp={timestamp}{api_secret}"))
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, file: Upload) -> Result<MediaAsset, AppError> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| AppError::Media("media store is not configured".into()))?;

        let timestamp = chrono::Utc::now().timestamp();
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(ct) = file.content_type.as_deref() {
            part = part
                .mime_str(ct)
                .map_err(|e| AppError::Validation(format!("bad content type: {e}")))?;
        }
        let form = Form::new()
            .text("api_key", cfg.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature_algorithm", "sha256")
            .text("signature", signature(timestamp, &cfg.api_secret))
            .part("file", part);

        let res = self
            .http
            .post(format!("{API_BASE}/{}/auto/upload", cfg.cloud_name))
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::Media(format!("cloudinary request: {e}")))?;
        let status = res.status();
        let body: UploadResponse = res
            .json()
            .await
            .map_err(|e| AppError::Media(format!("cloudinary response ({status}): {e}")))?;

        if let Some(err) = body.error {
            return Err(AppError::Media(format!("cloudinary ({status}): {}", err.message)));
        }
        body.secure_url
            .or(body.url)
            .map(|url| MediaAsset { url })
            .ok_or_else(|| AppError::Media(format!("cloudinary ({status}): no url in response")))
    }
}
