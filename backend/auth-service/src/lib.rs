// Auth Service Library

pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod models;
pub mod security;
pub mod services;
pub mod telemetry;

pub use error::{AuthError, Result};
pub use http::{build_router, AppState};
