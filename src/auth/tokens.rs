use mongodb::bson::oid::ObjectId;
use sha2::{Digest, Sha256};

use crate::{
    auth::jwt::{TokenKind, TokenService},
    errors::AppError,
};

#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn refresh_fingerprint(&self) -> String {
        sha256_hex(&self.refresh_token)
    }
}

pub fn issue_pair(tokens: &TokenService, user_id: &ObjectId) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access_token: tokens.issue(user_id, TokenKind::Access)?,
        refresh_token: tokens.issue(user_id, TokenKind::Refresh)?,
    })
}

pub fn sha256_hex(s: &str) -> String {
    let mut h = Sha256::new();
    h.update(s.as_bytes());
    hex::encode(h.finalize())
}

pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Whether `presented` is the refresh token whose fingerprint is stored.
pub fn matches_stored(presented: &str, stored_fingerprint: Option<&str>) -> bool {
    match stored_fingerprint {
        Some(stored) => constant_time_eq(sha256_hex(presented).as_bytes(), stored.as_bytes()),
        None => false,
    }
}
