//! Wire types for the Forecasting API.
//!
//! This file consolidates the DTO types exchanged with the backend.
//! All types derive Serialize/Deserialize for JSON transport.

use serde::{Deserialize, Serialize};

/// A forecasting model as listed by the backend catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Unique model identifier (e.g. `linear_regression`).
    pub name: String,
    /// Optional human-readable label supplied by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Optional provider label (cosmetic metadata).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Whether the model supports per-customer forecasts.
    #[serde(default)]
    pub supports_customers: bool,
}

/// The model catalog returned by `GET /models`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    /// Available models, in backend order.
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    /// Model the backend suggests as default, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

/// Extended descriptor for the currently selected model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub supports_customers: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Request body shared by `/predict`, `/predict/all_customers` and
/// `/export/excel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// First forecasted week (calendar date, serialized as `YYYY-MM-DD`).
    pub start_date: chrono::NaiveDate,
    /// Forecast horizon in weekly periods.
    pub periods: u32,
    /// Model identifier.
    pub model_name: String,
    /// Customer filter. Absent means "no filter".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

/// A prediction as it arrives on the wire.
///
/// Predicted values are kept as raw JSON values so a malformed entry can be
/// coerced during normalization instead of failing the whole response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPrediction {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub predictions: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl RawPrediction {
    /// Normalize into a [`PredictionResult`].
    ///
    /// Every predicted value is coerced to a finite `f64` (numbers kept,
    /// numeric strings parsed, anything else becomes 0.0). Dates and values
    /// are truncated to the shorter of the two sequences so the result
    /// always holds parallel series. An empty-string customer is treated as
    /// no customer.
    pub fn normalize(self) -> PredictionResult {
        let len = self.dates.len().min(self.predictions.len());
        let mut dates = self.dates;
        dates.truncate(len);
        let predictions = self
            .predictions
            .iter()
            .take(len)
            .map(coerce_finite)
            .collect();

        PredictionResult {
            dates,
            predictions,
            customer: self.customer.filter(|c| !c.is_empty()),
        }
    }
}

/// Coerce a raw JSON value to a finite number, defaulting to 0.0.
fn coerce_finite(value: &serde_json::Value) -> f64 {
    let numeric = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    };
    numeric.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// A normalized forecast: parallel date/value series, optionally scoped to
/// one customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub dates: Vec<String>,
    pub predictions: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
}

impl PredictionResult {
    /// Number of forecasted periods.
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Backend-reported model status (e.g. `ready`).
    pub model_status: String,
}

/// Response payload of `POST /export/excel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportHandle {
    /// URL where the generated workbook can be downloaded.
    pub download_url: String,
}

/// Fit metrics reported by `POST /model/train`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub r2: f64,
    pub rmse: f64,
    pub mae: f64,
}

/// Holdout metrics reported by `POST /forecasting/train_from_upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadTrainingMetrics {
    pub test_r2: f64,
    pub test_rmse: f64,
}
