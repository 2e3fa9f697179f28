//! Shared test data and in-memory state builders.

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    config::Config,
    dto::auth::RegisterForm,
    errors::AppError,
    media::{MediaAsset, MediaStore, Upload},
    models::user::{NewUser, UserDoc},
    password::hash_password,
    state::AppState,
    store::{memory::MemoryAccountStore, AccountStore},
};

pub const TEST_USERNAME: &str = "u1";
pub const TEST_EMAIL: &str = "u1@example.com";
pub const TEST_PASSWORD: &str = "SecurePass123";

/// Hands back a deterministic URL built from the file name.
pub struct FakeMedia;

#[async_trait]
impl MediaStore for FakeMedia {
    async fn upload(&self, file: Upload) -> Result<MediaAsset, AppError> {
        Ok(MediaAsset {
            url: format!("https://media.test/{}", file.file_name),
        })
    }
}

pub fn state_with_store(store: Arc<dyn AccountStore>) -> Arc<AppState> {
    Arc::new(AppState::from_parts(
        Config::for_tests(),
        store,
        Arc::new(FakeMedia),
    ))
}

pub fn test_state() -> (Arc<AppState>, Arc<MemoryAccountStore>) {
    let store = Arc::new(MemoryAccountStore::new());
    (state_with_store(store.clone()), store)
}

pub async fn seed_user(
    store: &MemoryAccountStore,
    username: &str,
    email: &str,
    password: &str,
) -> UserDoc {
    store
        .insert(UserDoc::from(NewUser {
            username: username.into(),
            email: email.into(),
            full_name: "Test User".into(),
            avatar: "https://media.test/seed.png".into(),
            cover_image: String::new(),
            password_hash: hash_password(password).expect("hash"),
        }))
        .await
        .expect("seed user")
}

pub fn upload(name: &str) -> Upload {
    Upload {
        file_name: name.into(),
        content_type: Some("image/png".into()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

pub fn register_form(username: &str, email: &str) -> RegisterForm {
    RegisterForm {
        full_name: "Test User".into(),
        username: username.into(),
        email: email.into(),
        password: TEST_PASSWORD.into(),
        avatar: Some(upload("avatar.png")),
        cover_image: None,
    }
}
