use async_trait::async_trait;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime as BsonDateTime},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};

use crate::{
    config::Config,
    errors::AppError,
    models::user::{ProfileImage, UserDoc},
    store::{user_not_found, AccountStore},
};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoAccountStore {
    users: Collection<UserDoc>,
}

impl MongoAccountStore {
    pub async fn connect(cfg: &Config) -> mongodb::error::Result<Self> {
        let mut opts = ClientOptions::parse(&cfg.mongodb_uri).await?;
        opts.app_name = Some("account-auth".to_string());
        let client = Client::with_options(opts)?;
        let users: Collection<UserDoc> = client.database(&cfg.db_name).collection("users");

        for field in ["username", "email"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            users.create_index(index).await?;
        }

        Ok(Self { users })
    }
}

fn is_duplicate_key(e: &MongoError) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(w)) => w.code == DUPLICATE_KEY,
        ErrorKind::Command(c) => c.code == DUPLICATE_KEY,
        _ => false,
    }
}

fn map_write(e: MongoError, conflict: &str) -> AppError {
    if is_duplicate_key(&e) {
        AppError::Conflict(conflict.to_string())
    } else {
        AppError::from(e)
    }
}

#[async_trait]
impl AccountStore for MongoAccountStore {
    async fn insert(&self, user: UserDoc) -> Result<UserDoc, AppError> {
        self.users
            .insert_one(&user)
            .await
            .map_err(|e| map_write(e, "User with email or username already exists"))?;
        Ok(user)
    }

    async fn find_by_credential_key(&self, key: &str) -> Result<Option<UserDoc>, AppError> {
        Ok(self
            .users
            .find_one(doc! { "$or": [ { "username": key }, { "email": key } ] })
            .await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<UserDoc>, AppError> {
        Ok(self.users.find_one(doc! { "_id": id }).await?)
    }

    async fn set_refresh_token(
        &self,
        id: &ObjectId,
        fingerprint: Option<String>,
    ) -> Result<(), AppError> {
        let update = match fingerprint {
            Some(fp) => doc! {
                "$set": { "refresh_token_hash": fp, "updated_at": BsonDateTime::now() },
            },
            None => doc! {
                "$unset": { "refresh_token_hash": "" },
                "$set": { "updated_at": BsonDateTime::now() },
            },
        };
        let res = self.users.update_one(doc! { "_id": id }, update).await?;
        if res.matched_count == 0 {
            return Err(user_not_found());
        }
        Ok(())
    }

    async fn replace_refresh_token(
        &self,
        id: &ObjectId,
        expected: &str,
        fingerprint: String,
    ) -> Result<bool, AppError> {
        let res = self
            .users
            .update_one(
                doc! { "_id": id, "refresh_token_hash": expected },
                doc! { "$set": { "refresh_token_hash": fingerprint, "updated_at": BsonDateTime::now() } },
            )
            .await?;
        if res.matched_count == 1 {
            return Ok(true);
        }
        match self.find_by_id(id).await? {
            Some(_) => Ok(false),
            None => Err(user_not_found()),
        }
    }

    async fn set_credential_hash(&self, id: &ObjectId, hash: String) -> Result<(), AppError> {
        let res = self
            .users
            .update_one(
                doc! { "_id": id },
                doc! {
                    "$set": { "password_hash": hash, "updated_at": BsonDateTime::now() },
                    "$unset": { "refresh_token_hash": "" },
                },
            )
            .await?;
        if res.matched_count == 0 {
            return Err(user_not_found());
        }
        Ok(())
    }

    async fn update_details(
        &self,
        id: &ObjectId,
        full_name: String,
        email: String,
    ) -> Result<UserDoc, AppError> {
        self.users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": {
                    "full_name": full_name,
                    "email": email,
                    "updated_at": BsonDateTime::now(),
                } },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| map_write(e, "Email is already in use"))?
            .ok_or_else(user_not_found)
    }

    async fn set_profile_image(
        &self,
        id: &ObjectId,
        image: ProfileImage,
        url: String,
    ) -> Result<UserDoc, AppError> {
        self.users
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { image.field(): url, "updated_at": BsonDateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(user_not_found)
    }
}
