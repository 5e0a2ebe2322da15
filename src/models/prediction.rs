use crate::normalize::round_to;
use chrono::{DateTime, Datelike, FixedOffset, Utc};

/// Number of most recent predictions kept for the chart
pub const PREDICTION_WINDOW_SIZE: usize = 4;

/// Chart values are rounded to this many decimals; stored values keep full precision
const CHART_DECIMALS: i32 = 2;

/// One forecast row written by the upstream bill predictor
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub created_at: DateTime<Utc>,
    pub predicted_kwh: f64,
    pub predicted_bill: f64,
}

/// The tail of the prediction series, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionWindow {
    entries: Vec<Prediction>,
}

impl PredictionWindow {
    /// Take the last [`PREDICTION_WINDOW_SIZE`] entries of a chronologically ordered series.
    ///
    /// Returns `None` for an empty series so callers keep whatever they had before.
    pub fn from_series(series: &[Prediction]) -> Option<Self> {
        if series.is_empty() {
            return None;
        }

        let start = series.len().saturating_sub(PREDICTION_WINDOW_SIZE);
        Some(Self {
            entries: series[start..].to_vec(),
        })
    }

    pub fn entries(&self) -> &[Prediction] {
        &self.entries
    }

    /// Parallel kWh, bill and label sequences for the combined chart
    pub fn series(&self, offset: FixedOffset) -> PredictionSeries {
        let mut series = PredictionSeries::default();

        for entry in &self.entries {
            series.kwh.push(round_to(entry.predicted_kwh, CHART_DECIMALS));
            series.bill.push(round_to(entry.predicted_bill, CHART_DECIMALS));
            series.labels.push(day_month_label(&entry.created_at, offset));
        }

        series
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionSeries {
    pub labels: Vec<String>,
    pub kwh: Vec<f64>,
    pub bill: Vec<f64>,
}

impl PredictionSeries {
    /// Four zeroed weeks, shown until the first prediction arrives
    pub fn placeholder() -> Self {
        Self {
            labels: (1..=PREDICTION_WINDOW_SIZE)
                .map(|week| format!("Week {}", week))
                .collect(),
            kwh: vec![0.0; PREDICTION_WINDOW_SIZE],
            bill: vec![0.0; PREDICTION_WINDOW_SIZE],
        }
    }
}

fn day_month_label(at: &DateTime<Utc>, offset: FixedOffset) -> String {
    let local = at.with_timezone(&offset);
    format!("{}/{}", local.day(), local.month())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn prediction(day: u32, kwh: f64, bill: f64) -> Prediction {
        Prediction {
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            predicted_kwh: kwh,
            predicted_bill: bill,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_empty_series_has_no_window() {
        assert!(PredictionWindow::from_series(&[]).is_none());
    }

    #[test]
    fn test_short_series_is_kept_whole() {
        let series = vec![prediction(1, 10.0, 100.0), prediction(2, 20.0, 200.0)];
        let window = PredictionWindow::from_series(&series).unwrap();

        assert_eq!(window.entries(), series.as_slice());
        assert_eq!(window.entries().len(), 2);
    }

    #[test]
    fn test_long_series_keeps_last_four_in_order() {
        let series: Vec<Prediction> = (1..=10)
            .map(|day| prediction(day, day as f64, day as f64 * 10.0))
            .collect();
        let window = PredictionWindow::from_series(&series).unwrap();

        assert_eq!(window.entries(), &series[6..]);
        let days: Vec<u32> = window.entries().iter().map(|p| p.created_at.day()).collect();
        assert_eq!(days, vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_series_rounds_and_labels() {
        let series = vec![
            prediction(5, 12.345678, 98.7651),
            prediction(6, 0.004, 1234.5),
        ];
        let chart = PredictionWindow::from_series(&series).unwrap().series(utc());

        assert_eq!(chart.labels, vec!["5/3", "6/3"]);
        assert_eq!(chart.kwh, vec![12.35, 0.0]);
        assert_eq!(chart.bill, vec![98.77, 1234.5]);
    }

    #[test]
    fn test_labels_follow_display_offset() {
        let late = Prediction {
            created_at: Utc.with_ymd_and_hms(2024, 3, 31, 20, 0, 0).unwrap(),
            predicted_kwh: 1.0,
            predicted_bill: 1.0,
        };
        let window = PredictionWindow::from_series(&[late]).unwrap();
        let ist = FixedOffset::east_opt(330 * 60).unwrap();

        assert_eq!(window.series(utc()).labels, vec!["31/3"]);
        assert_eq!(window.series(ist).labels, vec!["1/4"]);
    }

    #[test]
    fn test_placeholder_series() {
        let placeholder = PredictionSeries::placeholder();
        assert_eq!(
            placeholder.labels,
            vec!["Week 1", "Week 2", "Week 3", "Week 4"]
        );
        assert_eq!(placeholder.kwh, vec![0.0; 4]);
        assert_eq!(placeholder.bill, vec![0.0; 4]);
    }
}
