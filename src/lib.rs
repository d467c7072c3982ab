pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod portfolio;
pub mod services;
pub mod session;
pub mod workflow;

pub use api::ApiClient;
pub use config::AppConfig;
pub use errors::ApiError;
