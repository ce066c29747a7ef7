pub mod api;
pub mod auth;
pub mod models;
pub mod provider;
pub mod state;
pub mod ui;
