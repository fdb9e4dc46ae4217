//! Summary statistics over a forecast.

use serde::Serialize;

use crate::api::PredictionResult;

/// Aggregate statistics over a prediction's values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    /// Sum of all predicted values.
    pub total: f64,
    /// Arithmetic mean.
    pub average: f64,
    /// Largest predicted value.
    pub peak: f64,
    /// Smallest predicted value.
    pub lowest: f64,
    /// Number of forecasted periods.
    pub periods: usize,
}

/// Compute summary statistics for a prediction.
///
/// Pure function of the prediction, recomputed per call. Returns `None`
/// when the prediction has no values.
pub fn summarize(prediction: &PredictionResult) -> Option<ForecastSummary> {
    let values = &prediction.predictions;
    if values.is_empty() {
        return None;
    }

    let total: f64 = values.iter().sum();
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = values.iter().copied().fold(f64::INFINITY, f64::min);

    Some(ForecastSummary {
        total,
        average: total / values.len() as f64,
        peak,
        lowest,
        periods: values.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(values: &[f64]) -> PredictionResult {
        PredictionResult {
            dates: (0..values.len())
                .map(|i| format!("2025-01-{:02}", i + 6))
                .collect(),
            predictions: values.to_vec(),
            customer: None,
        }
    }

    #[test]
    fn test_summarize_empty_is_none() {
        assert_eq!(summarize(&PredictionResult::default()), None);
    }

    #[test]
    fn test_summarize_basic() {
        let summary = summarize(&prediction(&[10.0, 20.0, 30.0])).unwrap();
        assert_eq!(summary.total, 60.0);
        assert_eq!(summary.average, 20.0);
        assert_eq!(summary.peak, 30.0);
        assert_eq!(summary.lowest, 10.0);
        assert_eq!(summary.periods, 3);
    }

    #[test]
    fn test_summarize_single_value() {
        let summary = summarize(&prediction(&[42.0])).unwrap();
        assert_eq!(summary.total, 42.0);
        assert_eq!(summary.average, 42.0);
        assert_eq!(summary.peak, 42.0);
        assert_eq!(summary.lowest, 42.0);
        assert_eq!(summary.periods, 1);
    }
}
