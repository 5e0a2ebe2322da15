use serde::Serialize;

const LOW_BELOW_KWH: f64 = 2000.0;
const HIGH_ABOVE_KWH: f64 = 8000.0;

/// Qualitative band for cumulative consumption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackBand {
    Low,
    Moderate,
    High,
}

impl FeedbackBand {
    /// Both boundaries fall into `Moderate`
    pub fn classify(total_kwh: f64) -> Self {
        if total_kwh < LOW_BELOW_KWH {
            FeedbackBand::Low
        } else if total_kwh > HIGH_ABOVE_KWH {
            FeedbackBand::High
        } else {
            FeedbackBand::Moderate
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            FeedbackBand::Low => "Great job! Your energy usage is low. Keep saving the planet!",
            FeedbackBand::Moderate => "Moderate usage. Keep monitoring for better efficiency.",
            FeedbackBand::High => "High energy consumption! Consider switching off unused devices.",
        }
    }
}
