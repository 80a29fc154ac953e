//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The HTTP client for the upstream forecast service
//! - The query controller: status tracking, single-flight ordering,
//!   and unit-aware presentation of a stored payload
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod controller;
pub mod model;

pub use client::{DEFAULT_BASE_URL, FetchError, ForecastClient, ForecastSource};
pub use config::Config;
pub use controller::{QUERY_ERROR_MESSAGE, QueryState, QueryStatus, WeatherQueryController};
pub use model::{DisplayModel, ForecastPayload, TempUnit, present};
