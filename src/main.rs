// src/main.rs
mod auth;
mod config;
mod dto;
mod errors;
mod handlers;
mod media;
mod models;
mod openapi;
mod password;
mod routes;
mod services;
mod state;
mod store;
#[cfg(test)]
mod tests;

use crate::{config::Config, routes::app_router, state::AppState};
use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_auth=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = Config::from_env().expect("invalid configuration");
    let bind_addr = cfg.bind_addr.clone();
    let cors = cors_layer(&cfg.cors_origins);
    let state = Arc::new(AppState::new(cfg).await.expect("init state"));

    let app = app_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&bind_addr).await.expect("bind listener");
    tracing::info!(addr = %bind_addr, "listening");

    axum::serve(listener, app).await.expect("server error");
}
