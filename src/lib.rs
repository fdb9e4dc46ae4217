//! # Salescast
//!
//! Core library for a sales-forecasting dashboard. It owns the forecast
//! request lifecycle against a remote Forecasting API (model discovery and
//! selection, single and all-customer predictions, workbook export) plus
//! the derived client-side aggregates the UI renders (summary statistics,
//! chart series, axis bounds, display labels).
//!
//! ## Architecture
//!
//! - [`api`]: wire types (DTOs) for the Forecasting API
//! - [`backend`]: the API behind a trait, with HTTP and in-memory
//!   implementations
//! - [`models`]: domain value types (forecast window parameters)
//! - [`services`]: pure derived computations and the
//!   [`ForecastOrchestrator`]
//!
//! The orchestrator is single-owner, event-driven state: UI events call its
//! methods, a [`watch`](tokio::sync::watch) subscription reports every
//! state change, and all backend calls are asynchronous and independent. A
//! failed request reports an error and leaves prior state intact.

pub mod api;
pub mod backend;
pub mod models;
pub mod services;

pub use api::{ModelCatalog, ModelDescriptor, ModelInfo, PredictionResult};
pub use backend::{BackendConfig, BackendError, ForecastBackend};
pub use models::ForecastParams;
pub use services::{ForecastOrchestrator, SelectionToken};

#[cfg(feature = "http-client")]
pub use backend::HttpBackend;

#[cfg(feature = "local-backend")]
pub use backend::LocalBackend;
