pub mod limits;
pub mod prediction;
pub mod reading;

pub use limits::{Metric, MetricLimits};
pub use prediction::{Prediction, PredictionSeries, PredictionWindow, PREDICTION_WINDOW_SIZE};
pub use reading::Reading;
