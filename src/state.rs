//! The dashboard's single source of truth.
//!
//! Only the pollers commit into this state (the commit methods are crate-private);
//! everything presentation-facing is rederived from a snapshot by [`crate::view`].

use crate::history::{HistoryBuffer, HistoryWindow, WindowedMetric};
use crate::models::{Prediction, PredictionWindow, Reading};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardViewState {
    version: u64,
    opened_at: DateTime<Utc>,
    reading: Reading,
    history: HistoryBuffer,
    prediction_window: Option<PredictionWindow>,
    latest_prediction: Option<Prediction>,
}

/// What a reading commit observed about cumulative energy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KwhTrend {
    First,
    NonDecreasing,
    /// The store reported less energy than the previous reading; kept as-is
    Decreased { previous: f64 },
}

impl DashboardViewState {
    pub fn new(opened_at: DateTime<Utc>) -> Self {
        Self {
            version: 0,
            opened_at,
            reading: Reading::placeholder(opened_at),
            history: HistoryBuffer::new(),
            prediction_window: None,
            latest_prediction: None,
        }
    }

    /// Incremented on every commit
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn reading(&self) -> &Reading {
        &self.reading
    }

    pub fn has_reading(&self) -> bool {
        !self.history.window(WindowedMetric::Voltage).is_empty()
    }

    pub fn history(&self, metric: WindowedMetric) -> &HistoryWindow {
        self.history.window(metric)
    }

    pub fn prediction_window(&self) -> Option<&PredictionWindow> {
        self.prediction_window.as_ref()
    }

    pub fn latest_prediction(&self) -> Option<&Prediction> {
        self.latest_prediction.as_ref()
    }

    pub(crate) fn commit_reading(&mut self, reading: Reading) -> KwhTrend {
        let trend = if !self.has_reading() {
            KwhTrend::First
        } else if reading.total_kwh < self.reading.total_kwh {
            KwhTrend::Decreased {
                previous: self.reading.total_kwh,
            }
        } else {
            KwhTrend::NonDecreasing
        };

        self.history.push(WindowedMetric::Voltage, reading.voltage);
        self.history.push(WindowedMetric::Current, reading.current);
        self.reading = reading;
        self.version += 1;

        trend
    }

    /// Empty series are ignored and return `false`
    pub(crate) fn commit_predictions(&mut self, series: &[Prediction]) -> bool {
        let (Some(window), Some(latest)) = (PredictionWindow::from_series(series), series.last())
        else {
            return false;
        };

        self.latest_prediction = Some(latest.clone());
        self.prediction_window = Some(window);
        self.version += 1;

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn opened() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn reading(voltage: f64, total_kwh: f64) -> Reading {
        Reading {
            voltage,
            current: voltage / 100.0,
            power: 0.0,
            total_kwh,
            timestamp: opened(),
        }
    }

    fn prediction(hour: u32, kwh: f64) -> Prediction {
        Prediction {
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
            predicted_kwh: kwh,
            predicted_bill: kwh * 8.0,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = DashboardViewState::new(opened());

        assert_eq!(state.version(), 0);
        assert_eq!(state.reading(), &Reading::placeholder(opened()));
        assert!(!state.has_reading());
        assert!(state.prediction_window().is_none());
        assert!(state.latest_prediction().is_none());
    }

    #[test]
    fn test_commit_reading_feeds_history() {
        let mut state = DashboardViewState::new(opened());

        assert_eq!(state.commit_reading(reading(230.0, 10.0)), KwhTrend::First);
        assert_eq!(state.commit_reading(reading(231.0, 10.5)), KwhTrend::NonDecreasing);

        assert_eq!(state.version(), 2);
        assert_eq!(state.reading().voltage, 231.0);
        assert_eq!(state.history(WindowedMetric::Voltage).to_vec(), vec![230.0, 231.0]);
        assert_eq!(state.history(WindowedMetric::Current).to_vec(), vec![2.3, 2.31]);
    }

    #[test]
    fn test_decreasing_kwh_is_reported_but_kept() {
        let mut state = DashboardViewState::new(opened());
        state.commit_reading(reading(230.0, 100.0));

        let trend = state.commit_reading(reading(230.0, 99.0));

        assert_eq!(trend, KwhTrend::Decreased { previous: 100.0 });
        assert_eq!(state.reading().total_kwh, 99.0);
    }

    #[test]
    fn test_commit_predictions() {
        let mut state = DashboardViewState::new(opened());
        let series: Vec<Prediction> = (0..6).map(|h| prediction(h, h as f64)).collect();

        assert!(state.commit_predictions(&series));

        assert_eq!(state.latest_prediction(), Some(&series[5]));
        assert_eq!(state.prediction_window().unwrap().entries(), &series[2..]);
        assert_eq!(state.version(), 1);
    }

    #[test]
    fn test_empty_predictions_leave_state_untouched() {
        let mut state = DashboardViewState::new(opened());
        state.commit_predictions(&[prediction(1, 1.0), prediction(2, 2.0)]);
        let before = state.clone();

        assert!(!state.commit_predictions(&[]));

        assert_eq!(state, before);
    }
}
