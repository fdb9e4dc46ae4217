//! In-memory backend for testing and development.
//!
//! Serves a fixed model catalog and deterministic weekly series derived
//! from the model, customer and start date, with the same envelope
//! semantics as the deployed API: unknown models and customers come back
//! as backend-reported failures, not panics.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Duration;
use parking_lot::RwLock;
use serde_json::json;

use super::error::{BackendError, BackendResult};
use super::ForecastBackend;
use crate::api::{
    ExportHandle, ForecastRequest, HealthStatus, ModelCatalog, ModelDescriptor, ModelInfo,
    RawPrediction, TrainingMetrics, UploadTrainingMetrics,
};

/// Deterministic in-memory [`ForecastBackend`].
pub struct LocalBackend {
    catalog: ModelCatalog,
    descriptions: HashMap<String, String>,
    customers: HashMap<String, Vec<String>>,
    uploads: RwLock<Vec<String>>,
}

impl LocalBackend {
    /// Backend with the stock catalog: `linear_regression`, `sarima` and
    /// `prophet`, the first two with customer support.
    pub fn new() -> Self {
        let models = vec![
            ModelDescriptor {
                name: "linear_regression".into(),
                display_name: None,
                provider: Some("Manus".into()),
                supports_customers: true,
            },
            ModelDescriptor {
                name: "sarima".into(),
                display_name: None,
                provider: Some("Claude".into()),
                supports_customers: true,
            },
            ModelDescriptor {
                name: "prophet".into(),
                display_name: Some("Prophet".into()),
                provider: None,
                supports_customers: false,
            },
        ];

        let descriptions = HashMap::from([
            (
                "linear_regression".to_string(),
                "Weekly sales regression over historical order volumes.".to_string(),
            ),
            (
                "sarima".to_string(),
                "Seasonal ARIMA tuned on weekly aggregates.".to_string(),
            ),
            (
                "prophet".to_string(),
                "Additive trend model with yearly seasonality.".to_string(),
            ),
        ]);

        let shared_customers = vec![
            "Carrefour".to_string(),
            "Auchan".to_string(),
            "Intermarche".to_string(),
        ];
        let customers = HashMap::from([
            ("linear_regression".to_string(), shared_customers.clone()),
            ("sarima".to_string(), shared_customers),
            ("prophet".to_string(), Vec::new()),
        ]);

        Self {
            catalog: ModelCatalog {
                models,
                default_model: Some("linear_regression".into()),
            },
            descriptions,
            customers,
            uploads: RwLock::new(Vec::new()),
        }
    }

    fn descriptor(&self, model_name: &str) -> BackendResult<&ModelDescriptor> {
        self.catalog
            .models
            .iter()
            .find(|m| m.name == model_name)
            .ok_or_else(|| BackendError::Api(format!("Unknown model: {model_name}")))
    }

    /// Deterministic weekly series for one request.
    fn series(&self, request: &ForecastRequest, customer: Option<&str>) -> RawPrediction {
        let base = match request.model_name.as_str() {
            "linear_regression" => 1200.0,
            "sarima" => 950.0,
            _ => 800.0,
        };
        // Stable per-customer offset so series differ between customers.
        let offset = customer
            .map(|c| c.bytes().map(u64::from).sum::<u64>() % 200)
            .unwrap_or(0) as f64;

        let mut dates = Vec::with_capacity(request.periods as usize);
        let mut predictions = Vec::with_capacity(request.periods as usize);
        let mut date = request.start_date;
        for week in 0..request.periods {
            dates.push(date.format("%Y-%m-%d").to_string());
            let seasonal = f64::from(week % 4) * 25.0;
            predictions.push(json!(base + offset + seasonal + f64::from(week) * 10.0));
            date += Duration::weeks(1);
        }

        RawPrediction {
            dates,
            predictions,
            customer: customer.map(str::to_string),
        }
    }
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ForecastBackend for LocalBackend {
    async fn health(&self) -> BackendResult<HealthStatus> {
        Ok(HealthStatus {
            model_status: "ready".into(),
        })
    }

    async fn list_models(&self) -> BackendResult<ModelCatalog> {
        Ok(self.catalog.clone())
    }

    async fn model_info(&self, model_name: &str) -> BackendResult<ModelInfo> {
        let descriptor = self.descriptor(model_name)?;
        Ok(ModelInfo {
            name: descriptor.name.clone(),
            display_name: descriptor.display_name.clone(),
            description: self.descriptions.get(model_name).cloned(),
            supports_customers: descriptor.supports_customers,
            provider: descriptor.provider.clone(),
        })
    }

    async fn customers(&self, model_name: &str) -> BackendResult<Vec<String>> {
        self.descriptor(model_name)?;
        Ok(self.customers.get(model_name).cloned().unwrap_or_default())
    }

    async fn predict(&self, request: &ForecastRequest) -> BackendResult<RawPrediction> {
        let descriptor = self.descriptor(&request.model_name)?;
        let customer = match request.customer.as_deref() {
            Some(customer) => {
                if !descriptor.supports_customers {
                    return Err(BackendError::Api(format!(
                        "Model {} does not support customer forecasts",
                        request.model_name
                    )));
                }
                let known = self
                    .customers
                    .get(&request.model_name)
                    .is_some_and(|list| list.iter().any(|c| c == customer));
                if !known {
                    return Err(BackendError::Api(format!("Unknown customer: {customer}")));
                }
                Some(customer)
            }
            None => None,
        };
        Ok(self.series(request, customer))
    }

    async fn predict_all_customers(
        &self,
        request: &ForecastRequest,
    ) -> BackendResult<Vec<RawPrediction>> {
        let descriptor = self.descriptor(&request.model_name)?;
        if !descriptor.supports_customers {
            return Err(BackendError::Api(format!(
                "Model {} does not support customer forecasts",
                request.model_name
            )));
        }
        let customers = self
            .customers
            .get(&request.model_name)
            .cloned()
            .unwrap_or_default();
        Ok(customers
            .iter()
            .map(|customer| self.series(request, Some(customer)))
            .collect())
    }

    async fn export_excel(&self, request: &ForecastRequest) -> BackendResult<ExportHandle> {
        self.descriptor(&request.model_name)?;
        Ok(ExportHandle {
            download_url: format!(
                "local://forecasting-files/forecast_{}_{}.xlsx",
                request.model_name, request.start_date
            ),
        })
    }

    async fn train(&self) -> BackendResult<TrainingMetrics> {
        Ok(TrainingMetrics {
            r2: 0.94,
            rmse: 120.5,
            mae: 96.2,
        })
    }

    async fn upload_training_file(&self, filename: &str, _bytes: Vec<u8>) -> BackendResult<String> {
        if filename.is_empty() {
            return Err(BackendError::Api("Upload failed: empty filename".into()));
        }
        self.uploads.write().push(filename.to_string());
        Ok(filename.to_string())
    }

    async fn train_from_upload(&self, filename: &str) -> BackendResult<UploadTrainingMetrics> {
        if !self.uploads.read().iter().any(|f| f == filename) {
            return Err(BackendError::Api(format!(
                "Unknown training file: {filename}"
            )));
        }
        Ok(UploadTrainingMetrics {
            test_r2: 0.91,
            test_rmse: 134.0,
        })
    }
}
