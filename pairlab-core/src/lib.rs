//! PairLab Core — domain types, statistics, screens and price-data providers.
//!
//! This crate contains the statistical heart of pair discovery:
//! - Domain types (price series, pairs, spreads, screen results)
//! - Stateless numerics (OLS, ADF, MacKinnon p-values, Engle-Granger)
//! - The four screens: cointegration, Hurst, half-life, mean crossings
//! - Data providers (Yahoo Finance, CSV directory, synthetic) and symbol lists

pub mod data;
pub mod domain;
pub mod screen;
pub mod stats;
