//! End-to-end orchestrator flows against the in-memory backend.

#![cfg(feature = "local-backend")]

use std::sync::Arc;

use chrono::NaiveDate;
use salescast::models::ForecastParams;
use salescast::{ForecastOrchestrator, LocalBackend};

fn orchestrator() -> ForecastOrchestrator {
    let today = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
    ForecastOrchestrator::with_params(
        Arc::new(LocalBackend::new()),
        ForecastParams::default_for(today),
    )
}

#[tokio::test]
async fn startup_flow_produces_a_forecast() {
    let mut orch = orchestrator();

    let token = orch.load_models().await.expect("a model is selected");
    assert_eq!(orch.selected_model(), Some("linear_regression"));

    orch.load_model_context(token).await;
    assert!(orch.supports_customers());
    assert_eq!(orch.customers().len(), 3);
    assert_eq!(
        orch.active_model_display_name(),
        "Linear Regression (Manus)"
    );

    orch.maybe_auto_predict().await;
    let prediction = orch.prediction().expect("auto-predict fired");
    assert_eq!(prediction.len(), 52);
    // First forecasted week is the Monday after the clock date.
    assert_eq!(prediction.dates[0], "2025-01-13");
    // Silent prediction: no status message, no error.
    assert_eq!(orch.message(), None);
    assert_eq!(orch.error(), None);

    let summary = orch.summary().expect("summary for current prediction");
    assert_eq!(summary.periods, 52);
    assert!(summary.peak >= summary.lowest);
    assert!((summary.average - summary.total / 52.0).abs() < 1e-9);

    let series = orch.chart_series();
    assert_eq!(series.len(), 52);
    let domain = orch.chart_domain().expect("domain for non-empty series");
    assert!(domain.min >= 0.0);
    assert!(domain.max > domain.min);
}

#[tokio::test]
async fn customer_scoped_prediction_round_trip() {
    let mut orch = orchestrator();
    let token = orch.load_models().await.unwrap();
    orch.load_model_context(token).await;

    orch.select_customer(Some("Carrefour".into()));
    orch.set_periods(8);
    orch.predict(false).await;

    let prediction = orch.prediction().expect("prediction present");
    assert_eq!(prediction.customer.as_deref(), Some("Carrefour"));
    assert_eq!(prediction.len(), 8);
    assert_eq!(orch.message(), Some("Predictions generated successfully!"));
}

#[tokio::test]
async fn all_customers_batch_replaces_previous() {
    let mut orch = orchestrator();
    let token = orch.load_models().await.unwrap();
    orch.load_model_context(token).await;

    orch.predict_all_customers().await;
    assert_eq!(orch.all_predictions().len(), 3);
    assert_eq!(orch.message(), Some("Predictions generated for 3 customers!"));
    for prediction in orch.all_predictions() {
        assert!(prediction.customer.is_some());
        assert_eq!(prediction.dates.len(), prediction.predictions.len());
    }

    // Switching the model drops the batch.
    let token = orch.select_model("sarima");
    assert!(orch.all_predictions().is_empty());
    orch.load_model_context(token).await;
    orch.predict_all_customers().await;
    assert_eq!(orch.all_predictions().len(), 3);
}

#[tokio::test]
async fn unsupported_model_rejects_customer_actions() {
    let mut orch = orchestrator();
    orch.load_models().await.unwrap();
    let token = orch.select_model("prophet");
    orch.load_model_context(token).await;

    assert!(!orch.supports_customers());
    orch.predict_all_customers().await;
    assert_eq!(
        orch.error(),
        Some("The selected model does not support customer forecasts")
    );

    // A plain prediction still works, without a customer filter.
    orch.predict(false).await;
    let prediction = orch.prediction().expect("prediction present");
    assert_eq!(prediction.customer, None);
}

#[tokio::test]
async fn export_records_download_url() {
    let mut orch = orchestrator();
    let token = orch.load_models().await.unwrap();
    orch.load_model_context(token).await;

    orch.export_to_excel().await;
    let url = orch.last_export_url().expect("download url recorded");
    assert!(url.starts_with("local://forecasting-files/forecast_linear_regression_"));
    assert_eq!(orch.message(), Some("Excel file exported successfully!"));
}

#[tokio::test]
async fn health_check_reports_model_status() {
    let mut orch = orchestrator();
    let status = orch.check_health().await.expect("healthy backend");
    assert_eq!(status.model_status, "ready");
}

#[tokio::test]
async fn legacy_training_flow_reports_metrics() {
    let mut orch = orchestrator();
    orch.upload_and_train("sales_history.csv", b"week,qty\n2024-01-01,10\n".to_vec())
        .await;
    assert_eq!(orch.error(), None);
    let message = orch.message().expect("training message");
    assert!(message.starts_with("Model trained successfully!"));
}

#[tokio::test]
async fn revision_counter_tracks_the_whole_flow() {
    let mut orch = orchestrator();
    let receiver = orch.subscribe();
    let start = *receiver.borrow();

    let token = orch.load_models().await.unwrap();
    orch.load_model_context(token).await;
    orch.predict(false).await;

    assert!(*receiver.borrow() > start);
}
