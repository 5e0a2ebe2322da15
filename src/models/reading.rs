use chrono::{DateTime, Utc};

/// Latest snapshot from the meter, already rounded to display precision
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub total_kwh: f64,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// All-zero reading shown before the first successful fetch
    pub fn placeholder(at: DateTime<Utc>) -> Self {
        Self {
            voltage: 0.0,
            current: 0.0,
            power: 0.0,
            total_kwh: 0.0,
            timestamp: at,
        }
    }
}
