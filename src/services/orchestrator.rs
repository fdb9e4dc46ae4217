//! Forecast request lifecycle orchestration.
//!
//! [`ForecastOrchestrator`] owns every piece of dashboard state: the model
//! catalog, the active selection and its metadata, the forecast window, the
//! current prediction and multi-customer batch, and the user-facing
//! message/error slots. It has exactly two orthogonal lifecycles, model
//! selection (which drives the dependent info/customer fetches) and the
//! forecast parameters (which drive the predict action), composed by a
//! one-shot auto-predict latch.
//!
//! A UI layer binds through the accessors and [`subscribe`](ForecastOrchestrator::subscribe);
//! no view logic lives here.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::{ForecastRequest, HealthStatus, ModelDescriptor, ModelInfo, PredictionResult};
use crate::backend::ForecastBackend;
use crate::models::ForecastParams;
use crate::services::chart::{chart_domain, chart_series, ChartDomain, ChartPoint};
use crate::services::display::format_model_display_name;
use crate::services::summary::{summarize, ForecastSummary};

/// Identifies one model selection, for discarding superseded fetches.
///
/// [`ForecastOrchestrator::select_model`] hands out a fresh token; a
/// model-context load started with an older token is dropped without
/// touching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionToken(u64);

/// Owns the forecast request lifecycle against a [`ForecastBackend`].
pub struct ForecastOrchestrator {
    backend: Arc<dyn ForecastBackend>,

    models: Vec<ModelDescriptor>,
    selected_model: Option<String>,
    model_info: Option<ModelInfo>,
    customers: Vec<String>,

    params: ForecastParams,

    prediction: Option<PredictionResult>,
    all_predictions: Vec<PredictionResult>,
    last_export_url: Option<String>,

    message: Option<String>,
    error: Option<String>,
    loading: bool,

    auto_predicted: bool,
    selection_generation: u64,
    revision: watch::Sender<u64>,
}

impl ForecastOrchestrator {
    /// Orchestrator with the default forecast window (next upcoming Monday,
    /// full-year horizon) relative to the client clock.
    pub fn new(backend: Arc<dyn ForecastBackend>) -> Self {
        Self::with_params(
            backend,
            ForecastParams::default_for(Utc::now().date_naive()),
        )
    }

    /// Orchestrator with explicit initial parameters.
    pub fn with_params(backend: Arc<dyn ForecastBackend>, params: ForecastParams) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            backend,
            models: Vec::new(),
            selected_model: None,
            model_info: None,
            customers: Vec::new(),
            params,
            prediction: None,
            all_predictions: Vec::new(),
            last_export_url: None,
            message: None,
            error: None,
            loading: false,
            auto_predicted: false,
            selection_generation: 0,
            revision,
        }
    }

    // ==================== Model discovery and selection ====================

    /// Fetch the model catalog and select a default model.
    ///
    /// Selection precedence: a model literally named `linear_regression`,
    /// then the backend-suggested default, then the first entry. Returns the
    /// selection token when a model was selected so the caller can load its
    /// context. On failure the model list stays empty and the error is
    /// surfaced; there is no retry.
    pub async fn load_models(&mut self) -> Option<SelectionToken> {
        match self.backend.list_models().await {
            Ok(catalog) => {
                self.models = catalog.models;
                info!(count = self.models.len(), "loaded model catalog");
                let preferred = self
                    .models
                    .iter()
                    .find(|m| m.name == "linear_regression")
                    .map(|m| m.name.clone())
                    .or(catalog.default_model)
                    .or_else(|| self.models.first().map(|m| m.name.clone()));
                self.touch();
                preferred.map(|name| self.select_model(name))
            }
            Err(err) => {
                self.models.clear();
                self.set_error(err.to_string());
                None
            }
        }
    }

    /// Make `name` the active model.
    ///
    /// Clears the selected customer, any prediction and multi-customer
    /// batch, and prior status messages, and re-arms the auto-predict
    /// latch. The returned token is required by
    /// [`load_model_context`](Self::load_model_context).
    pub fn select_model(&mut self, name: impl Into<String>) -> SelectionToken {
        let name = name.into();
        debug!(model = %name, "model selected");
        self.selected_model = Some(name);
        self.params.clear_customer();
        self.prediction = None;
        self.all_predictions.clear();
        self.message = None;
        self.error = None;
        self.auto_predicted = false;
        self.selection_generation += 1;
        self.touch();
        SelectionToken(self.selection_generation)
    }

    /// Fetch model info and the customer list for the selection identified
    /// by `token`, concurrently.
    ///
    /// A load whose token no longer matches the current selection is
    /// discarded wholesale: it neither writes state nor surfaces errors.
    /// Customer-list failure clears the list and the selected customer;
    /// model-info failure surfaces an error but leaves other state alone.
    pub async fn load_model_context(&mut self, token: SelectionToken) {
        if token.0 != self.selection_generation {
            debug!("discarding model context load for superseded selection");
            return;
        }
        let Some(model) = self.selected_model.clone() else {
            return;
        };

        let backend = Arc::clone(&self.backend);
        let (info, customers) = tokio::join!(backend.model_info(&model), backend.customers(&model));

        match info {
            Ok(info) => self.model_info = Some(info),
            Err(err) => self.error = Some(err.to_string()),
        }
        match customers {
            Ok(list) => {
                let selected_known = self
                    .params
                    .customer()
                    .is_none_or(|c| list.iter().any(|known| known == c));
                if !selected_known {
                    self.params.clear_customer();
                }
                self.customers = list;
            }
            Err(_) => {
                self.customers.clear();
                self.params.clear_customer();
            }
        }
        self.touch();
    }

    // ==================== Forecast parameters ====================

    /// Set the forecast start date. Re-arms the auto-predict latch.
    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.params.set_start_date(date);
        self.auto_predicted = false;
        self.touch();
    }

    /// Set the horizon (clamped to [1, 52]). Re-arms the auto-predict latch.
    pub fn set_periods(&mut self, periods: u32) {
        self.params.set_periods(periods);
        self.auto_predicted = false;
        self.touch();
    }

    /// Set or clear the customer filter. `Some("")` counts as no filter.
    pub fn select_customer(&mut self, customer: Option<String>) {
        self.params.set_customer(customer);
        self.touch();
    }

    // ==================== Prediction lifecycle ====================

    /// Fire the one-shot silent prediction once a model and forecast window
    /// are set. The latch is reset only by a model change or an explicit
    /// date/horizon edit.
    pub async fn maybe_auto_predict(&mut self) {
        if self.auto_predicted
            || self.selected_model.is_none()
            || self.params.start_date().is_none()
        {
            return;
        }
        self.auto_predicted = true;
        self.predict(true).await;
    }

    /// Request a forecast and replace the current prediction on success.
    ///
    /// Validation failures (missing start date or model) surface an error
    /// without any network call. A silent call does not overwrite the
    /// status message on success, but still surfaces errors. On failure the
    /// existing prediction is left untouched.
    pub async fn predict(&mut self, silent: bool) {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(message) => {
                self.set_error(message);
                return;
            }
        };

        self.loading = true;
        self.error = None;
        if !silent {
            self.message = None;
        }
        self.touch();

        let result = self.backend.predict(&request).await;
        self.loading = false;
        match result {
            Ok(raw) => {
                let prediction = raw.normalize();
                info!(periods = prediction.len(), silent, "prediction generated");
                self.prediction = Some(prediction);
                if !silent {
                    self.message = Some("Predictions generated successfully!".to_string());
                }
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.touch();
    }

    /// Request one forecast per customer and replace the batch on success.
    ///
    /// Requires a model with customer support and a start date. On failure
    /// the existing batch is left untouched.
    pub async fn predict_all_customers(&mut self) {
        if !self.supports_customers() {
            self.set_error("The selected model does not support customer forecasts");
            return;
        }
        let Some(start_date) = self.params.start_date() else {
            self.set_error("Please select a start date");
            return;
        };
        let Some(model_name) = self.selected_model.clone() else {
            self.set_error("Please choose a forecasting model");
            return;
        };

        let request = ForecastRequest {
            start_date,
            periods: self.params.periods(),
            model_name,
            customer: None,
        };

        self.loading = true;
        self.error = None;
        self.message = None;
        self.touch();

        let result = self.backend.predict_all_customers(&request).await;
        self.loading = false;
        match result {
            Ok(batch) => {
                let count = batch.len();
                self.all_predictions = batch
                    .into_iter()
                    .map(crate::api::RawPrediction::normalize)
                    .collect();
                info!(count, "batch prediction generated");
                self.message = Some(format!("Predictions generated for {count} customers!"));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.touch();
    }

    /// Request a workbook export for the current parameters.
    ///
    /// Same preconditions and payload as [`predict`](Self::predict). On
    /// success the download URL is recorded for the UI to open; no other
    /// state is mutated beyond the status message.
    pub async fn export_to_excel(&mut self) {
        let request = match self.build_request() {
            Ok(request) => request,
            Err(message) => {
                self.set_error(message);
                return;
            }
        };

        self.loading = true;
        self.error = None;
        self.message = None;
        self.touch();

        let result = self.backend.export_excel(&request).await;
        self.loading = false;
        match result {
            Ok(handle) => {
                info!(url = %handle.download_url, "export ready");
                self.last_export_url = Some(handle.download_url);
                self.message = Some("Excel file exported successfully!".to_string());
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.touch();
    }

    /// Probe the backend and report its model status.
    pub async fn check_health(&mut self) -> Option<HealthStatus> {
        match self.backend.health().await {
            Ok(status) => Some(status),
            Err(err) => {
                self.set_error(err.to_string());
                None
            }
        }
    }

    /// Upload a training file and train from it (legacy training flow).
    ///
    /// Reports the holdout metrics in the status message on success.
    pub async fn upload_and_train(&mut self, filename: &str, bytes: Vec<u8>) {
        self.loading = true;
        self.error = None;
        self.message = None;
        self.touch();

        let result = async {
            let stored = self.backend.upload_training_file(filename, bytes).await?;
            self.backend.train_from_upload(&stored).await
        }
        .await;

        self.loading = false;
        match result {
            Ok(metrics) => {
                info!(r2 = metrics.test_r2, rmse = metrics.test_rmse, "model trained");
                self.message = Some(format!(
                    "Model trained successfully! R² = {:.3}, RMSE = {:.1}",
                    metrics.test_r2, metrics.test_rmse
                ));
            }
            Err(err) => self.error = Some(err.to_string()),
        }
        self.touch();
    }

    // ==================== Derived state ====================

    /// Summary statistics for the current prediction, if any.
    pub fn summary(&self) -> Option<ForecastSummary> {
        self.prediction.as_ref().and_then(summarize)
    }

    /// Chart series for the current prediction (empty when absent).
    pub fn chart_series(&self) -> Vec<ChartPoint> {
        self.prediction.as_ref().map(chart_series).unwrap_or_default()
    }

    /// Padded y-axis domain for the current prediction's chart.
    pub fn chart_domain(&self) -> Option<ChartDomain> {
        chart_domain(&self.chart_series())
    }

    /// Display label for the active model.
    pub fn active_model_display_name(&self) -> String {
        let name = self
            .model_info
            .as_ref()
            .map(|i| i.name.as_str())
            .or(self.selected_model.as_deref())
            .unwrap_or("");
        let display_name = self.model_info.as_ref().and_then(|i| i.display_name.as_deref());
        let provider = self.model_info.as_ref().and_then(|i| i.provider.as_deref());
        format_model_display_name(name, display_name, provider)
    }

    /// `(name, label)` pairs for a model picker, in catalog order.
    pub fn model_options(&self) -> Vec<(String, String)> {
        self.models
            .iter()
            .map(|m| {
                (
                    m.name.clone(),
                    format_model_display_name(&m.name, m.display_name.as_deref(), m.provider.as_deref()),
                )
            })
            .collect()
    }

    /// Whether the active model supports per-customer forecasts.
    pub fn supports_customers(&self) -> bool {
        self.model_info
            .as_ref()
            .is_some_and(|info| info.supports_customers)
    }

    // ==================== Accessors ====================

    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref()
    }

    pub fn customers(&self) -> &[String] {
        &self.customers
    }

    pub fn params(&self) -> &ForecastParams {
        &self.params
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        self.prediction.as_ref()
    }

    pub fn all_predictions(&self) -> &[PredictionResult] {
        &self.all_predictions
    }

    pub fn last_export_url(&self) -> Option<&str> {
        self.last_export_url.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Receiver that observes a revision counter bumped on every state
    /// change, so a UI layer can re-render on demand.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ==================== Internals ====================

    /// Build the shared predict/export payload, validating preconditions.
    /// The customer is attached only when the active model supports
    /// per-customer forecasts and one is selected.
    fn build_request(&self) -> Result<ForecastRequest, &'static str> {
        let Some(start_date) = self.params.start_date() else {
            return Err("Please select a start date");
        };
        let Some(model_name) = self.selected_model.clone() else {
            return Err("Please choose a forecasting model");
        };
        let customer = if self.supports_customers() {
            self.params.customer().map(str::to_string)
        } else {
            None
        };
        Ok(ForecastRequest {
            start_date,
            periods: self.params.periods(),
            model_name,
            customer,
        })
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
