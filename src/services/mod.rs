//! Service layer: pure derived computations and the forecast orchestrator.
//!
//! The pure services (summary, chart, display) are synchronous functions of
//! the current prediction, recomputed per call and never cached. The
//! orchestrator composes them with the backend-facing request lifecycle.

pub mod chart;
pub mod display;
pub mod orchestrator;
pub mod summary;

pub use chart::{chart_domain, chart_series, ChartDomain, ChartPoint};
pub use display::{format_model_display_name, model_provider};
pub use orchestrator::{ForecastOrchestrator, SelectionToken};
pub use summary::{summarize, ForecastSummary};
