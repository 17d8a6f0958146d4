//! FinStocks Common - configuration and logging shared by the API service and
//! the seeding tool.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod logging;

pub use config::{
    CacheConfig, Config, DatabaseConfig, DatabaseTarget, ObservabilityConfig, ServerConfig,
};
pub use logging::{init_logging, LogFormat};
