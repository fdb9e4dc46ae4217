//! Chart series and axis-domain computation.

use serde::Serialize;

use crate::api::PredictionResult;

/// One chart sample: the period's date label and rounded predicted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

/// Padded y-axis bounds for the forecast chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartDomain {
    pub min: f64,
    pub max: f64,
}

/// Build the chart series for a prediction. Values are rounded to the
/// nearest integer; an empty prediction yields an empty series.
pub fn chart_series(prediction: &PredictionResult) -> Vec<ChartPoint> {
    prediction
        .dates
        .iter()
        .zip(&prediction.predictions)
        .map(|(date, value)| ChartPoint {
            date: date.clone(),
            value: value.round(),
        })
        .collect()
}

/// Padded y-axis domain for a chart series.
///
/// A flat series is padded by 5% of the value (minimum 25), or a flat 50
/// when the value is 0. Otherwise the padding is 10% of the value range
/// (minimum 25). The lower bound never goes below 0.
pub fn chart_domain(points: &[ChartPoint]) -> Option<ChartDomain> {
    if points.is_empty() {
        return None;
    }

    let mut min_value = f64::INFINITY;
    let mut max_value = f64::NEG_INFINITY;
    for point in points {
        min_value = min_value.min(point.value);
        max_value = max_value.max(point.value);
    }

    if min_value == max_value {
        let padding = if min_value == 0.0 {
            50.0
        } else {
            (min_value * 0.05).max(25.0)
        };
        return Some(ChartDomain {
            min: (min_value - padding).max(0.0),
            max: min_value + padding,
        });
    }

    let padding = ((max_value - min_value) * 0.1).max(25.0);
    Some(ChartDomain {
        min: (min_value - padding).max(0.0),
        max: max_value + padding,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn points(values: &[f64]) -> Vec<ChartPoint> {
        values
            .iter()
            .map(|v| ChartPoint {
                date: "2025-01-06".into(),
                value: *v,
            })
            .collect()
    }

    #[test]
    fn test_chart_series_rounds_values() {
        let prediction = PredictionResult {
            dates: vec!["2025-01-06".into(), "2025-01-13".into()],
            predictions: vec![10.4, 10.6],
            customer: None,
        };
        let series = chart_series(&prediction);
        assert_eq!(series[0].value, 10.0);
        assert_eq!(series[1].value, 11.0);
    }

    #[test]
    fn test_chart_series_is_pure() {
        let prediction = PredictionResult {
            dates: vec!["2025-01-06".into()],
            predictions: vec![99.9],
            customer: None,
        };
        assert_eq!(chart_series(&prediction), chart_series(&prediction));
    }

    #[test]
    fn test_chart_series_empty() {
        assert!(chart_series(&PredictionResult::default()).is_empty());
    }

    #[test]
    fn test_domain_flat_series() {
        let domain = chart_domain(&points(&[100.0, 100.0, 100.0])).unwrap();
        assert_eq!(domain.min, 75.0);
        assert_eq!(domain.max, 125.0);
    }

    #[test]
    fn test_domain_flat_zero_series() {
        let domain = chart_domain(&points(&[0.0, 0.0, 0.0])).unwrap();
        assert_eq!(domain.min, 0.0);
        assert_eq!(domain.max, 50.0);
    }

    #[test]
    fn test_domain_floors_lower_bound_at_zero() {
        // range 80 -> padding max(8, 25) = 25; 10 - 25 < 0.
        let domain = chart_domain(&points(&[10.0, 90.0])).unwrap();
        assert_eq!(domain.min, 0.0);
        assert_eq!(domain.max, 115.0);
    }

    #[test]
    fn test_domain_large_range_uses_relative_padding() {
        let domain = chart_domain(&points(&[1000.0, 2000.0])).unwrap();
        assert_eq!(domain.min, 900.0);
        assert_eq!(domain.max, 2100.0);
    }

    #[test]
    fn test_domain_empty_is_none() {
        assert_eq!(chart_domain(&[]), None);
    }

    proptest! {
        #[test]
        fn prop_domain_encloses_values(values in proptest::collection::vec(0.0f64..1e9, 1..64)) {
            let pts = points(&values);
            let domain = chart_domain(&pts).unwrap();
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(domain.min >= 0.0);
            prop_assert!(domain.min <= lo);
            prop_assert!(domain.max > hi);
        }
    }
}
