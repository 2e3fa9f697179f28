pub mod account;
pub mod auth;
mod form;
