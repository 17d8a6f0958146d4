//! FinStocks API Library
//!
//! A read-mostly HTTP API over a database of stocks, sectors, fundamentals,
//! technical indicators and ETFs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 finstocks-api (:8000)                    │
//! ├──────────────────────────────────────────────────────────┤
//! │  routes ──► ReadCaches (windowed LRU) ──┐                │
//! │     │                                   ▼                │
//! │     └──────────────────────────► dyn MarketStore         │
//! │                                   ├─ SqliteStore         │
//! │                                   └─ PostgrestStore      │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod cache;
pub mod error;
pub mod model;
pub mod routes;
pub mod screener;
pub mod store;

use anyhow::Result;
use axum::Router;
use finstocks_common::{CacheConfig, Config};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::cache::{Clock, SystemClock, WindowedCache};
use crate::model::{Etf, PriceBar, ScreenedStock, Sector};
use crate::store::MarketStore;

pub use error::{ApiError, ApiResult};
pub use routes::build_router;
pub use store::{connect, StoreError};

/// Memoized reads, one cache per endpoint.
pub struct ReadCaches {
    pub sectors: WindowedCache<(), Vec<Sector>>,
    pub etfs: WindowedCache<(), Vec<Etf>>,
    /// Keyed by (symbol, days)
    pub etf_prices: WindowedCache<(String, u32), Vec<PriceBar>>,
    /// Keyed by the normalized filter
    pub screener: WindowedCache<String, Vec<ScreenedStock>>,
}

impl ReadCaches {
    pub fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let window = config.window_secs;
        Self {
            sectors: WindowedCache::new("sectors", config.sectors_capacity, window, clock.clone()),
            etfs: WindowedCache::new("etfs", config.etfs_capacity, window, clock.clone()),
            etf_prices: WindowedCache::new(
                "etf_prices",
                config.etf_prices_capacity,
                window,
                clock.clone(),
            ),
            screener: WindowedCache::new("screener", config.screener_capacity, window, clock),
        }
    }
}

/// API service state
pub struct ApiState {
    /// Configuration
    pub config: Config,
    /// Market data store
    pub store: Arc<dyn MarketStore>,
    /// Windowed read caches
    pub caches: ReadCaches,
}

impl ApiState {
    pub fn new(config: Config, store: Arc<dyn MarketStore>) -> Self {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// State whose caches read time from `clock`.
    pub fn with_clock(config: Config, store: Arc<dyn MarketStore>, clock: Arc<dyn Clock>) -> Self {
        let caches = ReadCaches::new(&config.cache, clock);
        Self {
            config,
            store,
            caches,
        }
    }
}

/// Main API service
pub struct ApiService {
    state: Arc<ApiState>,
}

impl ApiService {
    pub fn new(config: Config, store: Arc<dyn MarketStore>) -> Self {
        Self {
            state: Arc::new(ApiState::new(config, store)),
        }
    }

    /// Router with CORS and request tracing applied.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        build_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let app = self.router();

        let addr: SocketAddr = self.state.config.bind_address().parse()?;
        tracing::info!(
            address = %addr,
            backend = self.state.store.backend(),
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
