//! HTTP client for the deployed Forecasting API.
//!
//! JSON over HTTPS against the endpoints described in the trait docs. Every
//! response carries a `success` flag; a `false` answer is surfaced verbatim
//! as [`BackendError::Api`], transport failures (including the bounded
//! request timeout) as [`BackendError::Network`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::config::BackendConfig;
use super::error::{BackendError, BackendResult};
use super::ForecastBackend;
use crate::api::{
    ExportHandle, ForecastRequest, HealthStatus, ModelCatalog, ModelDescriptor, ModelInfo,
    RawPrediction, TrainingMetrics, UploadTrainingMetrics,
};

/// Reqwest-based [`ForecastBackend`] implementation.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client from the given configuration.
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BackendError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    /// Build a client from environment variables (see [`BackendConfig::from_env`]).
    pub fn from_env() -> BackendResult<Self> {
        let config = BackendConfig::from_env().map_err(BackendError::Config)?;
        Self::new(config)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> BackendResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn post_json<B: serde::Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}

fn transport(err: reqwest::Error) -> BackendError {
    BackendError::Network(err.to_string())
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> BackendResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))
}

/// Unwrap a `success`/`error` envelope.
fn check<T>(
    success: bool,
    error: Option<String>,
    payload: Option<T>,
    fallback: &str,
) -> BackendResult<T> {
    if !success {
        return Err(BackendError::Api(
            error.unwrap_or_else(|| fallback.to_string()),
        ));
    }
    payload.ok_or_else(|| BackendError::InvalidResponse(format!("missing payload: {fallback}")))
}

fn success_by_default() -> bool {
    true
}

// The health endpoint answers a bare `{ model_status }` when healthy and a
// failure envelope otherwise, so `success` defaults to true.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default = "success_by_default")]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    model_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    models: Vec<ModelDescriptor>,
    #[serde(default)]
    default_model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelInfoResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct CustomersResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    customers: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<RawPrediction>,
}

#[derive(Debug, Deserialize)]
struct PredictAllResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    data: Option<Vec<RawPrediction>>,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrainResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    metrics: Option<TrainingMetrics>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrainFromUploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    metrics: Option<UploadTrainingMetrics>,
}

#[async_trait]
impl ForecastBackend for HttpBackend {
    async fn health(&self) -> BackendResult<HealthStatus> {
        let response: HealthResponse = self.get_json("/health", &[]).await?;
        let model_status = check(
            response.success,
            response.error,
            response.model_status,
            "Health check failed",
        )?;
        Ok(HealthStatus { model_status })
    }

    async fn list_models(&self) -> BackendResult<ModelCatalog> {
        let response: ModelsResponse = self.get_json("/models", &[]).await?;
        if !response.success {
            return Err(BackendError::Api(
                response
                    .error
                    .unwrap_or_else(|| "Unable to load models".to_string()),
            ));
        }
        Ok(ModelCatalog {
            models: response.models,
            default_model: response.default_model,
        })
    }

    async fn model_info(&self, model_name: &str) -> BackendResult<ModelInfo> {
        let response: ModelInfoResponse = self
            .get_json("/model/info", &[("model_name", model_name)])
            .await?;
        check(
            response.success,
            response.error,
            response.data,
            "Unable to load model info",
        )
    }

    async fn customers(&self, model_name: &str) -> BackendResult<Vec<String>> {
        let response: CustomersResponse = self
            .get_json("/customers", &[("model_name", model_name)])
            .await?;
        check(
            response.success,
            response.error,
            response.customers,
            "Unable to load customers",
        )
    }

    async fn predict(&self, request: &ForecastRequest) -> BackendResult<RawPrediction> {
        let response: PredictResponse = self.post_json("/predict", request).await?;
        check(
            response.success,
            response.error,
            response.data,
            "Prediction failed",
        )
    }

    async fn predict_all_customers(
        &self,
        request: &ForecastRequest,
    ) -> BackendResult<Vec<RawPrediction>> {
        let response: PredictAllResponse =
            self.post_json("/predict/all_customers", request).await?;
        check(
            response.success,
            response.error,
            response.data,
            "Prediction failed",
        )
    }

    async fn export_excel(&self, request: &ForecastRequest) -> BackendResult<ExportHandle> {
        let response: ExportResponse = self.post_json("/export/excel", request).await?;
        let download_url = check(
            response.success,
            response.error,
            response.download_url,
            "Export failed",
        )?;
        Ok(ExportHandle { download_url })
    }

    async fn train(&self) -> BackendResult<TrainingMetrics> {
        let url = self.url("/model/train");
        debug!(%url, "POST");
        let response = self.client.post(&url).send().await.map_err(transport)?;
        let body: TrainResponse = decode(response).await?;
        check(body.success, body.error, body.metrics, "Training failed")
    }

    async fn upload_training_file(&self, filename: &str, bytes: Vec<u8>) -> BackendResult<String> {
        let url = self.url("/forecasting/upload");
        debug!(%url, filename, "POST (multipart)");
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let body: UploadResponse = decode(response).await?;
        check(body.success, body.error, body.filename, "Upload failed")
    }

    async fn train_from_upload(&self, filename: &str) -> BackendResult<UploadTrainingMetrics> {
        let response: TrainFromUploadResponse = self
            .post_json(
                "/forecasting/train_from_upload",
                &serde_json::json!({ "filename": filename }),
            )
            .await?;
        check(
            response.success,
            response.error,
            response.metrics,
            "Training failed",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_surfaces_backend_error_verbatim() {
        let result: BackendResult<u32> =
            check(false, Some("model not found".into()), Some(1), "fallback");
        assert_eq!(result.unwrap_err().to_string(), "model not found");
    }

    #[test]
    fn test_check_uses_fallback_when_error_missing() {
        let result: BackendResult<u32> = check(false, None, None, "Prediction failed");
        assert_eq!(result.unwrap_err().to_string(), "Prediction failed");
    }

    #[test]
    fn test_check_rejects_missing_payload() {
        let result: BackendResult<u32> = check(true, None, None, "Prediction failed");
        assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
    }

    #[test]
    fn test_envelope_deserialization() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"success": true, "data": {"dates": ["2025-01-06"], "predictions": [12.5]}}"#,
        )
        .unwrap();
        assert!(response.success);
        assert_eq!(response.data.unwrap().dates, vec!["2025-01-06"]);
    }

    #[test]
    fn test_health_failure_surfaces_backend_error() {
        let response: HealthResponse =
            serde_json::from_str(r#"{"success": false, "error": "model is down"}"#).unwrap();
        let result = check(
            response.success,
            response.error,
            response.model_status,
            "Health check failed",
        );
        assert_eq!(result.unwrap_err().to_string(), "model is down");
    }

    #[test]
    fn test_health_bare_body_is_success() {
        let response: HealthResponse =
            serde_json::from_str(r#"{"model_status": "ready"}"#).unwrap();
        assert!(response.success);
        let status = check(
            response.success,
            response.error,
            response.model_status,
            "Health check failed",
        )
        .unwrap();
        assert_eq!(status, "ready");
    }

    #[test]
    fn test_failure_envelope_deserialization() {
        let response: PredictResponse =
            serde_json::from_str(r#"{"success": false, "error": "model not found"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("model not found"));
    }
}
