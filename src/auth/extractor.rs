use std::sync::Arc;

use axum::{extract::FromRequestParts, http::request::Parts, RequestPartsExt};
use axum_extra::{
    extract::CookieJar,
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use mongodb::bson::oid::ObjectId;

use crate::{
    auth::{
        cookies::ACCESS_TOKEN_COOKIE,
        jwt::{TokenError, TokenKind},
    },
    errors::AppError,
    state::AppState,
};

/// Principal proven by a valid access token. Carries only the id; flows that
/// need the record load it themselves.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: ObjectId,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = match jar.get(ACCESS_TOKEN_COOKIE) {
            Some(c) if !c.value().is_empty() => c.value().to_string(),
            _ => {
                let TypedHeader(Authorization(bearer)) = parts
                    .extract::<TypedHeader<Authorization<Bearer>>>()
                    .await
                    .map_err(|_| AppError::Unauthorized)?;
                bearer.token().to_string()
            }
        };

        let claims = state
            .tokens
            .verify(&token, TokenKind::Access)
            .map_err(|e| match e {
                TokenError::Expired => AppError::TokenExpired,
                TokenError::Invalid => AppError::InvalidToken,
            })?;
        let id = claims.user_id().map_err(|_| AppError::InvalidToken)?;
        Ok(Self { id })
    }
}
