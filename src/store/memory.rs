use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use tokio::sync::RwLock;

use crate::{
    errors::AppError,
    models::user::{ProfileImage, UserDoc},
    store::{user_not_found, AccountStore},
};

#[derive(Default)]
pub struct MemoryAccountStore {
    users: RwLock<HashMap<ObjectId, UserDoc>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn refresh_fingerprint(&self, id: &ObjectId) -> Option<String> {
        self.users
            .read()
            .await
            .get(id)
            .and_then(|u| u.refresh_token_hash.clone())
    }

    pub async fn password_hash(&self, id: &ObjectId) -> Option<String> {
        self.users.read().await.get(id).map(|u| u.password_hash.clone())
    }
}

fn with_user<T>(
    users: &mut HashMap<ObjectId, UserDoc>,
    id: &ObjectId,
    f: impl FnOnce(&mut UserDoc) -> T,
) -> Result<T, AppError> {
    let user = users.get_mut(id).ok_or_else(user_not_found)?;
    user.updated_at = BsonDateTime::now();
    Ok(f(user))
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, user: UserDoc) -> Result<UserDoc, AppError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(AppError::Conflict(
                "User with email or username already exists".into(),
            ));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_credential_key(&self, key: &str) -> Result<Option<UserDoc>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == key || u.email == key)
            .cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, AppError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn set_refresh_token(
        &self,
        id: &ObjectId,
        fingerprint: Option<String>,
    ) -> Result<(), AppError> {
        with_user(&mut *self.users.write().await, id, |u| {
            u.refresh_token_hash = fingerprint;
        })
    }

    async fn replace_refresh_token(
        &self,
        id: &ObjectId,
        expected: &str,
        fingerprint: String,
    ) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or_else(user_not_found)?;
        if user.refresh_token_hash.as_deref() != Some(expected) {
            return Ok(false);
        }
        user.refresh_token_hash = Some(fingerprint);
        user.updated_at = BsonDateTime::now();
        Ok(true)
    }

    async fn set_credential_hash(&self, id: &ObjectId, hash: String) -> Result<(), AppError> {
        with_user(&mut *self.users.write().await, id, |u| {
            u.password_hash = hash;
            u.refresh_token_hash = None;
        })
    }

    async fn update_details(
        &self,
        id: &ObjectId,
        full_name: String,
        email: String,
    ) -> Result<UserDoc, AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.id != *id && u.email == email) {
            return Err(AppError::Conflict("Email is already in use".into()));
        }
        with_user(&mut users, id, |u| {
            u.full_name = full_name;
            u.email = email;
            u.clone()
        })
    }

    async fn set_profile_image(
        &self,
        id: &ObjectId,
        image: ProfileImage,
        url: String,
    ) -> Result<UserDoc, AppError> {
        with_user(&mut *self.users.write().await, id, |u| {
            match image {
                ProfileImage::Avatar => u.avatar = url,
                ProfileImage::Cover => u.cover_image = url,
            }
            u.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::*;

    #[tokio::test]
    async fn stale_expected_fingerprint_leaves_record_untouched() {
        let store = MemoryAccountStore::new();
        let user = seed_user(&store, TEST_USERNAME, TEST_EMAIL, TEST_PASSWORD).await;
        store.set_refresh_token(&user.id, Some("current".into())).await.unwrap();

        let swapped = store
            .replace_refresh_token(&user.id, "stale", "next".into())
            .await
            .unwrap();
        assert!(!swapped);
        assert_eq!(store.refresh_fingerprint(&user.id).await.as_deref(), Some("current"));

        assert!(store
            .replace_refresh_token(&user.id, "current", "next".into())
            .await
            .unwrap());
        assert_eq!(store.refresh_fingerprint(&user.id).await.as_deref(), Some("next"));
    }

    #[tokio::test]
    async fn replace_on_missing_principal_is_not_found() {
        let store = MemoryAccountStore::new();
        let err = store
            .replace_refresh_token(&ObjectId::new(), "any", "next".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
