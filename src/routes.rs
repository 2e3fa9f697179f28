use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::{
    handlers::{account as account_handlers, auth as auth_handlers},
    openapi,
    state::AppState,
};

const JSON_BODY_LIMIT: usize = 16 * 1024;
const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

pub fn app_router(state: Arc<AppState>) -> Router {
    let json = Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/logout", post(auth_handlers::logout))
        .route("/refresh-token", post(auth_handlers::refresh))
        .route("/change-password", post(auth_handlers::change_password))
        .route("/current-user", get(account_handlers::current_user))
        .route("/update-account", patch(account_handlers::update_account))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT));

    let uploads = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/avatar", patch(account_handlers::update_avatar))
        .route("/cover-image", patch(account_handlers::update_cover_image))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .nest("/api/v1/users", json.merge(uploads))
        .route("/api/v1/openapi.json", get(openapi::openapi_json))
        .with_state(state)
}
