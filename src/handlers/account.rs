use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    auth::AuthUser,
    dto::{account::UpdateAccountRequest, response::ApiResponse},
    errors::AppError,
    handlers::form,
    models::user::{ProfileImage, UserPublic},
    services::account_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/users/current-user",
    responses(
        (status = 200, description = "The authenticated user", body = UserPublic),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "users"
)]
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<ApiResponse<UserPublic>, AppError> {
    let user = account_service::current_user(&state, &user.id).await?;
    Ok(ApiResponse::ok(user, "Current user fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/users/update-account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated user", body = UserPublic),
        (status = 409, description = "Email is already in use")
    ),
    tag = "users"
)]
pub async fn update_account(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    WithRejection(Json(req), _): WithRejection<Json<UpdateAccountRequest>, AppError>,
) -> Result<ApiResponse<UserPublic>, AppError> {
    let user = account_service::update_details(&state, &user.id, req).await?;
    Ok(ApiResponse::ok(user, "Account details updated successfully"))
}

pub async fn update_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<ApiResponse<UserPublic>, AppError> {
    let file = form::single_file(multipart, "avatar").await?;
    let user = account_service::update_image(&state, &user.id, ProfileImage::Avatar, file).await?;
    Ok(ApiResponse::ok(user, "Avatar updated successfully"))
}

pub async fn update_cover_image(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    WithRejection(multipart, _): WithRejection<Multipart, AppError>,
) -> Result<ApiResponse<UserPublic>, AppError> {
    let file = form::single_file(multipart, "coverImage").await?;
    let user = account_service::update_image(&state, &user.id, ProfileImage::Cover, file).await?;
    Ok(ApiResponse::ok(user, "Cover image updated successfully"))
}
