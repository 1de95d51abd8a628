// src/backend/lib.rs

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod telemetry;
pub mod utils;

pub use api::PortfolioApp;
pub use config::AppConfig;
pub use error::{CredentialError, PortfolioError};
