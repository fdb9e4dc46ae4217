//! Forecasting API collaborator.
//!
//! The remote backend is modelled as a repository-style trait so the
//! orchestrator can be driven against the deployed HTTP API or the
//! in-memory [`LocalBackend`] interchangeably.

pub mod config;
pub mod error;

#[cfg(feature = "http-client")]
pub mod http;

#[cfg(feature = "local-backend")]
pub mod local;

pub use config::BackendConfig;
pub use error::{BackendError, BackendResult};

#[cfg(feature = "http-client")]
pub use http::HttpBackend;

#[cfg(feature = "local-backend")]
pub use local::LocalBackend;

use async_trait::async_trait;

use crate::api::{
    ExportHandle, ForecastRequest, HealthStatus, ModelCatalog, ModelInfo, RawPrediction,
    TrainingMetrics, UploadTrainingMetrics,
};

/// Client-side view of the Forecasting API.
///
/// Every operation is asynchronous and independent; a failed call reports an
/// error and leaves the caller's state to the caller. Any endpoint may
/// answer `{ success: false, error }`, which implementations surface as
/// [`BackendError::Api`].
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ForecastBackend: Send + Sync {
    /// GET `/health`: backend and model readiness.
    async fn health(&self) -> BackendResult<HealthStatus>;

    /// GET `/models`: the model catalog and suggested default.
    async fn list_models(&self) -> BackendResult<ModelCatalog>;

    /// GET `/model/info?model_name=`: extended descriptor for one model.
    async fn model_info(&self, model_name: &str) -> BackendResult<ModelInfo>;

    /// GET `/customers?model_name=`: customers the model can forecast.
    async fn customers(&self, model_name: &str) -> BackendResult<Vec<String>>;

    /// POST `/predict`: forecast for one model + parameter combination.
    async fn predict(&self, request: &ForecastRequest) -> BackendResult<RawPrediction>;

    /// POST `/predict/all_customers`: one forecast per known customer.
    async fn predict_all_customers(
        &self,
        request: &ForecastRequest,
    ) -> BackendResult<Vec<RawPrediction>>;

    /// POST `/export/excel`: generate a workbook and return its URL.
    async fn export_excel(&self, request: &ForecastRequest) -> BackendResult<ExportHandle>;

    /// POST `/model/train`: retrain the active model (legacy variant).
    async fn train(&self) -> BackendResult<TrainingMetrics>;

    /// POST `/forecasting/upload`: upload a training file (legacy variant).
    ///
    /// Returns the filename under which the backend stored the upload.
    async fn upload_training_file(&self, filename: &str, bytes: Vec<u8>) -> BackendResult<String>;

    /// POST `/forecasting/train_from_upload`: train from a previously
    /// uploaded file (legacy variant).
    async fn train_from_upload(&self, filename: &str) -> BackendResult<UploadTrainingMetrics>;
}
