use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDoc {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,
    pub email: String,
    pub full_name: String,

    pub avatar: String,
    #[serde(default)]
    pub cover_image: String,

    pub password_hash: String,
    // sha256 of the live refresh token, absent when no session is open
    #[serde(default)]
    pub refresh_token_hash: Option<String>,

    pub created_at: BsonDateTime,
    pub updated_at: BsonDateTime,
}

/// Fields supplied at registration, already validated and hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub password_hash: String,
}

impl From<NewUser> for UserDoc {
    fn from(u: NewUser) -> Self {
        let now = BsonDateTime::now();
        Self {
            id: ObjectId::new(),
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            avatar: u.avatar,
            cover_image: u.cover_image,
            password_hash: u.password_hash,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    Avatar,
    Cover,
}

impl ProfileImage {
    pub fn field(self) -> &'static str {
        match self {
            ProfileImage::Avatar => "avatar",
            ProfileImage::Cover => "cover_image",
        }
    }
}

/// Outward view of a user; never carries the password or refresh fingerprint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserDoc> for UserPublic {
    fn from(u: UserDoc) -> Self {
        Self {
            id: u.id.to_hex(),
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            avatar: u.avatar,
            cover_image: u.cover_image,
            created_at: bson_to_rfc3339(u.created_at),
            updated_at: bson_to_rfc3339(u.updated_at),
        }
    }
}

fn bson_to_rfc3339(dt: BsonDateTime) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp_millis(dt.timestamp_millis())
        .map(|d| d.to_rfc3339())
        .unwrap_or_default()
}
