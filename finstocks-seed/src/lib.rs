//! FinStocks seeding library
//!
//! Reference data, synthetic generators and the batched loader behind the
//! `finstocks-seed` binary.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod catalog;
pub mod etf;
pub mod generate;
pub mod holdings;
pub mod loader;
pub mod tasks;

pub use loader::{LoadReport, Loader};
pub use tasks::StockOptions;
