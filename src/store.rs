use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::{
    errors::AppError,
    models::user::{ProfileImage, UserDoc},
};

#[cfg(test)]
pub mod memory;
pub mod mongo;

/// Persistence the session and profile flows need from the account store.
///
/// Refresh tokens are held as fingerprints (see `auth::tokens::sha256_hex`);
/// each principal has at most one. Writes touching that field are single
/// per-record updates, so concurrent writers resolve last-writer-wins unless
/// the conditional [`AccountStore::replace_refresh_token`] is used.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken.
    async fn insert(&self, user: UserDoc) -> Result<UserDoc, AppError>;

    /// Matches either the username or the email field, case-sensitively.
    async fn find_by_credential_key(&self, key: &str) -> Result<Option<UserDoc>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, AppError>;

    /// Overwrites (or clears, with `None`) the live refresh fingerprint.
    async fn set_refresh_token(
        &self,
        id: &ObjectId,
        fingerprint: Option<String>,
    ) -> Result<(), AppError>;

    /// Compare-and-replace. `Ok(false)` when the stored fingerprint is no
    /// longer `expected`; `NotFound` when the principal is gone.
    async fn replace_refresh_token(
        &self,
        id: &ObjectId,
        expected: &str,
        fingerprint: String,
    ) -> Result<bool, AppError>;

    /// Replaces the password hash and clears the refresh fingerprint in one write.
    async fn set_credential_hash(&self, id: &ObjectId, hash: String) -> Result<(), AppError>;

    async fn update_details(
        &self,
        id: &ObjectId,
        full_name: String,
        email: String,
    ) -> Result<UserDoc, AppError>;

    async fn set_profile_image(
        &self,
        id: &ObjectId,
        image: ProfileImage,
        url: String,
    ) -> Result<UserDoc, AppError>;
}

pub(crate) fn user_not_found() -> AppError {
    AppError::NotFound("User does not exist".into())
}
