use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{CookieJar, WithRejection};

use crate::{
    auth::{
        cookies::{clear_session, set_session, REFRESH_TOKEN_COOKIE},
        AuthUser,
    },
    dto::{
        auth::{
            ChangePasswordRequest, LoginData, LoginRequest, RefreshRequest, RegisterForm,
            TokensData,
        },
        response::{ApiResponse, Empty},
    },
    errors::AppError,
    handlers::form,
    models::user::UserPublic,
    services::auth_service,
    state::AppState,
};

type JsonBody<T> = WithRejection<Json<T>, AppError>;

pub async fn register(
    State(state): State<Arc<AppState>>,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<ApiResponse<UserPublic>, AppError> {
    let mut reg = RegisterForm::default();
    let files = form::collect(multipart, &["avatar", "coverImage"], |name, value| match name {
        "fullName" => reg.full_name = value,
        "username" => reg.username = value,
        "email" => reg.email = value,
        "password" => reg.password = value,
        _ => {}
    })
    .await?;
    for (name, upload) in files {
        match name.as_str() {
            "avatar" => reg.avatar = Some(upload),
            _ => reg.cover_image = Some(upload),
        }
    }

    let user = auth_service::register(&state, reg).await?;
    Ok(ApiResponse::new(
        StatusCode::CREATED,
        user,
        "User registered successfully",
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; accessToken and refreshToken cookies set"),
        (status = 401, description = "Invalid user credentials"),
        (status = 404, description = "User does not exist")
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    WithRejection(Json(req), _): JsonBody<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<LoginData>), AppError> {
    let out = auth_service::login(&state, req).await?;
    let jar = set_session(jar, &out.tokens, state.cfg.cookie_secure);
    Ok((
        jar,
        ApiResponse::ok(
            LoginData {
                user: out.user,
                access_token: out.tokens.access_token,
                refresh_token: out.tokens.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Refresh token revoked and session cookies cleared"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "users"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<Empty>), AppError> {
    auth_service::logout(&state, &user.id).await?;
    let jar = clear_session(jar, state.cfg.cookie_secure);
    Ok((jar, ApiResponse::ok(Empty {}, "User logged out")))
}

/// The refresh token comes from the cookie when present, otherwise from the body.
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh-token",
    request_body(content = RefreshRequest, description = "Optional when the refreshToken cookie is sent"),
    responses(
        (status = 200, description = "New token pair issued and stored"),
        (status = 401, description = "Missing, invalid or revoked refresh token"),
        (status = 409, description = "Refresh token was rotated concurrently")
    ),
    tag = "users"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(CookieJar, ApiResponse<TokensData>), AppError> {
    let from_body = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice::<RefreshRequest>(&body)
            .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))?
    };
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or(from_body.refresh_token);

    let tokens = auth_service::refresh(&state, presented).await?;
    let jar = set_session(jar, &tokens, state.cfg.cookie_secure);
    Ok((
        jar,
        ApiResponse::ok(
            TokensData {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
            },
            "Access token refreshed",
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed; all sessions revoked"),
        (status = 401, description = "Invalid old password or access token")
    ),
    tag = "users"
)]
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    jar: CookieJar,
    WithRejection(Json(req), _): JsonBody<ChangePasswordRequest>,
) -> Result<(CookieJar, ApiResponse<Empty>), AppError> {
    auth_service::change_password(&state, &user.id, req.old_password, req.new_password).await?;
    let jar = clear_session(jar, state.cfg.cookie_secure);
    Ok((jar, ApiResponse::ok(Empty {}, "Password changed successfully")))
}
