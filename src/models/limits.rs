use serde::{Deserialize, Serialize};

/// Scalar metrics carried by a [`crate::models::Reading`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Voltage,
    Current,
    Power,
    TotalKwh,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Voltage,
        Metric::Current,
        Metric::Power,
        Metric::TotalKwh,
    ];

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Voltage => "V",
            Metric::Current => "A",
            Metric::Power => "W",
            Metric::TotalKwh => "kWh",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Metric::Voltage => "#3b82f6",
            Metric::Current => "#ef4444",
            Metric::Power => "#10b981",
            Metric::TotalKwh => "#8b5cf6",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Voltage => "Voltage",
            Metric::Current => "Current",
            Metric::Power => "Power",
            Metric::TotalKwh => "Energy (kWh)",
        }
    }
}

/// Full-scale values for the gauges
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricLimits {
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub total_kwh: f64,
}

impl MetricLimits {
    pub const DEFAULT: MetricLimits = MetricLimits {
        voltage: 240.0,
        current: 63.0,
        power: 15_000.0,
        total_kwh: 10_000.0,
    };

    pub fn max_for(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Voltage => self.voltage,
            Metric::Current => self.current,
            Metric::Power => self.power,
            Metric::TotalKwh => self.total_kwh,
        }
    }
}

impl Default for MetricLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}
