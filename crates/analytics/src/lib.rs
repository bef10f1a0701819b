//! # Rolling Sharpe Analytics
//!
//! This crate holds the calculation pipeline that turns a daily price series
//! plus an annualized risk-free rate into a rolling, annualized Sharpe ratio
//! series with its intermediate statistics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `RollingSharpeCalculator` takes a price
//!   series and an already-resolved risk-free rate as input and produces the
//!   derived series as output. Rate acquisition (and its fallback policy)
//!   belongs to the caller, which keeps this crate deterministic and easy to
//!   test.
//!
//! ## Public API
//!
//! - `RollingSharpeCalculator`: The struct that contains the calculation logic.
//! - `RollingStatsRow`: One fully-resolved output row per trading day.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::RollingSharpeCalculator;
pub use error::AnalyticsError;
pub use report::RollingStatsRow;
