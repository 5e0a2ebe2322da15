//! Render-ready projection of [`DashboardViewState`].
//!
//! [`build`] is a pure function of the state snapshot and display settings: it
//! never reads the clock, so the same inputs always produce the same view.

pub mod chart;
pub mod gauge;

pub use chart::{Axis, AxisId, AxisPosition, ChartData, ChartOptions, ChartView, Dataset, TooltipFormat};
pub use gauge::GaugeView;

use crate::config::DisplayConfig;
use crate::feedback::FeedbackBand;
use crate::history::{HistoryWindow, WindowedMetric};
use crate::models::{Metric, MetricLimits, PredictionSeries};
use crate::state::DashboardViewState;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

const DATE_TIME_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";
const DATE_FORMAT: &str = "%d/%m/%Y";

const KWH_COLOR: &str = "#3b82f6";
const KWH_FILL: &str = "rgba(59, 130, 246, 0.5)";
const BILL_COLOR: &str = "#f59e0b";
const BILL_FILL: &str = "rgba(245, 158, 11, 0.5)";
const PREDICTION_TENSION: f64 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub version: u64,
    /// Timestamp of the current reading, formatted for the header
    pub last_updated: String,
    pub gauges: Vec<GaugeView>,
    pub voltage_chart: ChartView,
    pub current_chart: ChartView,
    pub prediction_chart: ChartView,
    pub feedback: FeedbackView,
    pub summary: PredictionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackView {
    pub band: FeedbackBand,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub kwh: f64,
    pub bill: f64,
    pub kwh_display: String,
    pub bill_display: String,
    pub updated_display: String,
}

pub fn build(state: &DashboardViewState, display: &DisplayConfig) -> DashboardView {
    let offset = display.offset();
    let reading = state.reading();
    let band = FeedbackBand::classify(reading.total_kwh);

    DashboardView {
        version: state.version(),
        last_updated: format_in(&reading.timestamp, offset, DATE_TIME_FORMAT),
        gauges: gauge::gauges(reading, &MetricLimits::DEFAULT),
        voltage_chart: trend_chart(
            "Voltage Graph",
            "Voltage (V)",
            Metric::Voltage.color(),
            " V",
            state.history(WindowedMetric::Voltage),
        ),
        current_chart: trend_chart(
            "Current Graph",
            "Current (A)",
            Metric::Current.color(),
            " A",
            state.history(WindowedMetric::Current),
        ),
        prediction_chart: prediction_chart(state, display),
        feedback: FeedbackView {
            band,
            message: band.message().to_string(),
        },
        summary: summary(state, display),
    }
}

fn trend_chart(
    title: &str,
    label: &str,
    color: &str,
    unit_suffix: &str,
    window: &HistoryWindow,
) -> ChartView {
    ChartView {
        title: title.to_string(),
        data: ChartData {
            labels: window.labels(),
            datasets: vec![Dataset {
                label: label.to_string(),
                data: window.to_vec(),
                border_color: color.to_string(),
                background_color: color.to_string(),
                fill: false,
                tension: 0.0,
                y_axis_id: AxisId::Primary,
                tooltip: TooltipFormat::suffix(unit_suffix),
            }],
        },
        options: ChartOptions::single_axis(),
    }
}

fn prediction_chart(state: &DashboardViewState, display: &DisplayConfig) -> ChartView {
    let series = state
        .prediction_window()
        .map(|window| window.series(display.offset()))
        .unwrap_or_else(PredictionSeries::placeholder);

    let bill_title = format!("Bill ({})", display.currency_symbol);

    ChartView {
        title: "Predicted kWh & Bill".to_string(),
        data: ChartData {
            labels: series.labels,
            datasets: vec![
                Dataset {
                    label: "Predicted kWh".to_string(),
                    data: series.kwh,
                    border_color: KWH_COLOR.to_string(),
                    background_color: KWH_FILL.to_string(),
                    fill: true,
                    tension: PREDICTION_TENSION,
                    y_axis_id: AxisId::Primary,
                    tooltip: TooltipFormat::suffix(" kWh"),
                },
                Dataset {
                    label: format!("Predicted {}", bill_title),
                    data: series.bill,
                    border_color: BILL_COLOR.to_string(),
                    background_color: BILL_FILL.to_string(),
                    fill: true,
                    tension: PREDICTION_TENSION,
                    y_axis_id: AxisId::Secondary,
                    tooltip: TooltipFormat::prefix(display.currency_symbol.clone()),
                },
            ],
        },
        options: ChartOptions::dual_axis("kWh", bill_title),
    }
}

fn summary(state: &DashboardViewState, display: &DisplayConfig) -> PredictionSummary {
    let offset = display.offset();
    let (kwh, bill, updated) = match state.latest_prediction() {
        Some(latest) => (latest.predicted_kwh, latest.predicted_bill, latest.created_at),
        None => (0.0, 0.0, state.opened_at()),
    };

    PredictionSummary {
        kwh,
        bill,
        kwh_display: format!("{:.6} kWh", kwh),
        bill_display: format!("{}{:.2}", display.currency_symbol, bill),
        updated_display: format_in(&updated, offset, DATE_FORMAT),
    }
}

fn format_in(at: &DateTime<Utc>, offset: FixedOffset, format: &str) -> String {
    at.with_timezone(&offset).format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Prediction, Reading};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn opened() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 18, 45, 30).unwrap()
    }

    fn reading(voltage: f64, total_kwh: f64) -> Reading {
        Reading {
            voltage,
            current: 4.5,
            power: 1035.0,
            total_kwh,
            timestamp: opened(),
        }
    }

    fn predictions(count: u32) -> Vec<Prediction> {
        (1..=count)
            .map(|day| Prediction {
                created_at: Utc.with_ymd_and_hms(2024, 6, day, 9, 0, 0).unwrap(),
                predicted_kwh: day as f64 + 0.123456789,
                predicted_bill: day as f64 * 100.0 + 0.5551,
            })
            .collect()
    }

    fn populated_state() -> DashboardViewState {
        let mut state = DashboardViewState::new(opened());
        state.commit_reading(reading(230.0, 4500.0));
        state.commit_reading(reading(231.5, 4500.5));
        state.commit_predictions(&predictions(6));
        state
    }

    #[test]
    fn test_build_is_idempotent() {
        let state = populated_state();
        let display = DisplayConfig::default();

        let first = build(&state, &display);
        let second = build(&state, &display);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_trend_chart_labels_follow_window() {
        let mut state = DashboardViewState::new(opened());
        for v in 1..=6 {
            state.commit_reading(reading(v as f64, 0.0));
        }

        let view = build(&state, &DisplayConfig::default());
        let data = &view.voltage_chart.data;

        assert_eq!(data.datasets[0].data, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(data.labels, vec!["T-6", "T-5", "T-4", "T-3", "T-2", "T-1"]);
        assert_eq!(data.datasets[0].label, "Voltage (V)");
        assert!(!data.datasets[0].fill);
    }

    #[test]
    fn test_empty_state_view() {
        let state = DashboardViewState::new(opened());
        let view = build(&state, &DisplayConfig::default());

        assert_eq!(view.version, 0);
        assert!(view.voltage_chart.data.labels.is_empty());
        assert!(view.current_chart.data.datasets[0].data.is_empty());
        assert_eq!(
            view.prediction_chart.data.labels,
            vec!["Week 1", "Week 2", "Week 3", "Week 4"]
        );
        assert_eq!(view.prediction_chart.data.datasets[0].data, vec![0.0; 4]);
        assert_eq!(view.summary.kwh_display, "0.000000 kWh");
        assert_eq!(view.summary.bill_display, "₹0.00");
        assert_eq!(view.summary.updated_display, "15/06/2024");
        assert_eq!(view.last_updated, "15/06/2024, 18:45:30");
        assert_eq!(view.feedback.band, FeedbackBand::Low);
    }

    #[test]
    fn test_gauges_pair_value_with_limit() {
        let view = build(&populated_state(), &DisplayConfig::default());

        let units: Vec<&str> = view.gauges.iter().map(|g| g.unit.as_str()).collect();
        assert_eq!(units, vec!["V", "A", "W", "kWh"]);

        let voltage = &view.gauges[0];
        assert_eq!(voltage.value, 231.5);
        assert_eq!(voltage.max_value, 240.0);
        assert_eq!(view.gauges[3].fraction, 0.45005);
    }

    #[test]
    fn test_prediction_chart_uses_window_and_two_axes() {
        let view = build(&populated_state(), &DisplayConfig::default());
        let chart = &view.prediction_chart;

        assert_eq!(chart.data.labels, vec!["3/6", "4/6", "5/6", "6/6"]);
        assert_eq!(chart.data.datasets[0].data, vec![3.12, 4.12, 5.12, 6.12]);
        assert_eq!(chart.data.datasets[1].data, vec![300.56, 400.56, 500.56, 600.56]);
        assert_eq!(chart.data.datasets[0].y_axis_id, AxisId::Primary);
        assert_eq!(chart.data.datasets[1].y_axis_id, AxisId::Secondary);
        assert_eq!(chart.data.datasets[1].label, "Predicted Bill (₹)");

        let right = chart.options.axis(AxisId::Secondary).unwrap();
        assert!(!right.draw_grid_on_chart_area);
        assert_eq!(right.title.as_deref(), Some("Bill (₹)"));
    }

    #[test]
    fn test_summary_uses_latest_prediction_full_precision() {
        let view = build(&populated_state(), &DisplayConfig::default());

        assert_eq!(view.summary.kwh, 6.0 + 0.123456789);
        assert_eq!(view.summary.kwh_display, "6.123457 kWh");
        assert_eq!(view.summary.bill_display, "₹600.56");
        assert_eq!(view.summary.updated_display, "06/06/2024");
    }

    #[test]
    fn test_display_offset_shifts_dates() {
        let display = DisplayConfig {
            utc_offset_minutes: 330,
            ..Default::default()
        };
        let view = build(&DashboardViewState::new(opened()), &display);

        assert_eq!(view.last_updated, "16/06/2024, 00:15:30");
        assert_eq!(view.summary.updated_display, "16/06/2024");
    }

    #[test]
    fn test_feedback_follows_total_kwh() {
        let mut state = DashboardViewState::new(opened());
        state.commit_reading(reading(230.0, 8000.001));

        let view = build(&state, &DisplayConfig::default());

        assert_eq!(view.feedback.band, FeedbackBand::High);
        assert_eq!(view.feedback.message, FeedbackBand::High.message());
    }
}
