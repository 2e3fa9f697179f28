pub mod account_service;
pub mod auth_service;
