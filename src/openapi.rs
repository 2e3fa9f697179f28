use axum::Json;
use utoipa::OpenApi;

use crate::{
    dto::{
        account::UpdateAccountRequest,
        auth::{ChangePasswordRequest, LoginData, LoginRequest, RefreshRequest, TokensData},
    },
    handlers,
    models::user::UserPublic,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::refresh,
        handlers::auth::change_password,
        handlers::account::current_user,
        handlers::account::update_account,
    ),
    components(schemas(
        LoginRequest,
        RefreshRequest,
        ChangePasswordRequest,
        UpdateAccountRequest,
        LoginData,
        TokensData,
        UserPublic,
    )),
    tags((name = "users", description = "Account registration, sessions and profile"))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
