use mongodb::bson::oid::ObjectId;

use crate::{
    auth::{
        jwt::TokenKind,
        tokens::{issue_pair, matches_stored, TokenPair},
    },
    dto::auth::{LoginRequest, RegisterForm},
    errors::AppError,
    models::user::{NewUser, UserDoc, UserPublic},
    password::{hash_password_blocking, validate_password, verify_password_blocking},
    state::AppState,
};

pub struct LoginOutput {
    pub user: UserPublic,
    pub tokens: TokenPair,
}

fn issuance_failed(e: AppError) -> AppError {
    AppError::Internal(format!("refresh token persistence failed: {e}"))
}

pub async fn register(state: &AppState, form: RegisterForm) -> Result<UserPublic, AppError> {
    let full_name = form.full_name.trim().to_string();
    let username = form.username.trim().to_string();
    let email = form.email.trim().to_string();

    if [&full_name, &username, &email].iter().any(|f| f.is_empty()) || form.password.is_empty() {
        return Err(AppError::Validation("All fields are required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("email is invalid".into()));
    }
    validate_password(&form.password)?;

    for key in [&username, &email] {
        if state.store.find_by_credential_key(key).await?.is_some() {
            return Err(AppError::Conflict(
                "User with email or username already exists".into(),
            ));
        }
    }

    let avatar = form
        .avatar
        .ok_or_else(|| AppError::Validation("Avatar file is required".into()))?;
    let avatar = state.media.upload(avatar).await?;
    let cover_image = match form.cover_image {
        Some(file) => state.media.upload(file).await?.url,
        None => String::new(),
    };

    let password_hash = hash_password_blocking(form.password).await?;
    let user = state
        .store
        .insert(UserDoc::from(NewUser {
            username,
            email,
            full_name,
            avatar: avatar.url,
            cover_image,
            password_hash,
        }))
        .await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(user.into())
}

pub async fn login(state: &AppState, req: LoginRequest) -> Result<LoginOutput, AppError> {
    let keys = req.identifiers();
    if keys.is_empty() {
        return Err(AppError::Validation("Username or Email is required".into()));
    }

    // either key may match, as with an `$or` over username and email
    let mut found = None;
    for key in keys {
        if let Some(user) = state.store.find_by_credential_key(key).await? {
            found = Some(user);
            break;
        }
    }
    let user = found.ok_or_else(|| AppError::NotFound("User does not exist".into()))?;

    if !verify_password_blocking(req.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = %user.id, "login rejected: bad password");
        return Err(AppError::InvalidCredentials);
    }

    let tokens = issue_pair(&state.tokens, &user.id)?;
    state
        .store
        .set_refresh_token(&user.id, Some(tokens.refresh_fingerprint()))
        .await
        .map_err(issuance_failed)?;

    tracing::info!(user_id = %user.id, "user logged in");
    Ok(LoginOutput {
        user: user.into(),
        tokens,
    })
}

pub async fn logout(state: &AppState, user_id: &ObjectId) -> Result<(), AppError> {
    state.store.set_refresh_token(user_id, None).await?;
    tracing::info!(user_id = %user_id, "user logged out");
    Ok(())
}

/// Rotates the refresh token. The new pair is returned only after the
/// conditional write confirmed it as the stored one.
pub async fn refresh(state: &AppState, presented: Option<String>) -> Result<TokenPair, AppError> {
    let presented = presented
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)?;

    let claims = state
        .tokens
        .verify(&presented, TokenKind::Refresh)
        .map_err(|_| AppError::InvalidToken)?;
    let user_id = claims.user_id().map_err(|_| AppError::InvalidToken)?;

    let user = state
        .store
        .find_by_id(&user_id)
        .await?
        .ok_or(AppError::InvalidToken)?;

    let stored = user.refresh_token_hash.as_deref();
    let Some(expected) = stored.filter(|_| matches_stored(&presented, stored)) else {
        tracing::warn!(user_id = %user_id, "refresh rejected: token superseded or revoked");
        return Err(AppError::TokenExpired);
    };

    let tokens = issue_pair(&state.tokens, &user_id)?;
    match state
        .store
        .replace_refresh_token(&user_id, expected, tokens.refresh_fingerprint())
        .await
    {
        Ok(true) => {
            tracing::info!(user_id = %user_id, "refresh token rotated");
            Ok(tokens)
        }
        Ok(false) => {
            tracing::warn!(user_id = %user_id, "refresh lost a concurrent rotation");
            Err(AppError::Conflict("Refresh token was already rotated".into()))
        }
        Err(AppError::NotFound(_)) => Err(AppError::InvalidToken),
        Err(e) => Err(issuance_failed(e)),
    }
}

/// Also revokes the stored refresh token, ending every open session.
pub async fn change_password(
    state: &AppState,
    user_id: &ObjectId,
    old_password: String,
    new_password: String,
) -> Result<(), AppError> {
    let user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;

    if !verify_password_blocking(old_password, user.password_hash).await? {
        return Err(AppError::InvalidCredentials);
    }

    let hash = hash_password_blocking(new_password).await?;
    state.store.set_credential_hash(user_id, hash).await?;
    tracing::info!(user_id = %user_id, "password changed, sessions revoked");
    Ok(())
}
