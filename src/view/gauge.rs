use crate::models::{Metric, MetricLimits, Reading};
use serde::Serialize;

/// Gauge rendering contract: `{ value, maxValue, color, unit }` plus the fill fraction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeView {
    pub metric: Metric,
    pub title: String,
    pub value: f64,
    pub max_value: f64,
    /// `value / max_value`, clamped to `0.0..=1.0`
    pub fraction: f64,
    pub color: String,
    pub unit: String,
}

impl GaugeView {
    pub fn new(metric: Metric, value: f64, limits: &MetricLimits) -> Self {
        let max_value = limits.max_for(metric);
        let fraction = if max_value > 0.0 {
            (value / max_value).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            metric,
            title: metric.title().to_string(),
            value,
            max_value,
            fraction,
            color: metric.color().to_string(),
            unit: metric.unit().to_string(),
        }
    }
}

pub fn reading_value(reading: &Reading, metric: Metric) -> f64 {
    match metric {
        Metric::Voltage => reading.voltage,
        Metric::Current => reading.current,
        Metric::Power => reading.power,
        Metric::TotalKwh => reading.total_kwh,
    }
}

/// One gauge per metric, in display order
pub fn gauges(reading: &Reading, limits: &MetricLimits) -> Vec<GaugeView> {
    Metric::ALL
        .iter()
        .map(|&metric| GaugeView::new(metric, reading_value(reading, metric), limits))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_is_relative_to_limit() {
        let gauge = GaugeView::new(Metric::Voltage, 120.0, &MetricLimits::DEFAULT);

        assert_eq!(gauge.fraction, 0.5);
        assert_eq!(gauge.max_value, 240.0);
        assert_eq!(gauge.unit, "V");
        assert_eq!(gauge.color, "#3b82f6");
    }

    #[test]
    fn test_fraction_is_clamped() {
        let over = GaugeView::new(Metric::Power, 20_000.0, &MetricLimits::DEFAULT);
        let under = GaugeView::new(Metric::Current, -1.0, &MetricLimits::DEFAULT);

        assert_eq!(over.fraction, 1.0);
        assert_eq!(over.value, 20_000.0);
        assert_eq!(under.fraction, 0.0);
    }

    #[test]
    fn test_gauge_serializes_max_value_camel_case() {
        let gauge = GaugeView::new(Metric::TotalKwh, 2500.0, &MetricLimits::DEFAULT);
        let json = serde_json::to_value(&gauge).unwrap();

        assert_eq!(json["maxValue"], 10_000.0);
        assert_eq!(json["metric"], "total_kwh");
        assert_eq!(json["fraction"], 0.25);
    }
}
