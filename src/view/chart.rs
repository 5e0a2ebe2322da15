//! Chart rendering contract: labels plus datasets, each bound to an axis.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub title: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: String,
    pub background_color: String,
    pub fill: bool,
    pub tension: f64,
    #[serde(rename = "yAxisID")]
    pub y_axis_id: AxisId,
    pub tooltip: TooltipFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisId {
    #[serde(rename = "y")]
    Primary,
    #[serde(rename = "y1")]
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub id: AxisId,
    pub position: AxisPosition,
    pub title: Option<String>,
    pub begin_at_zero: bool,
    /// Whether this axis' grid lines are drawn across the plot
    pub draw_grid_on_chart_area: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub axes: Vec<Axis>,
}

/// How a point value is shown in tooltips, e.g. `₹` + value or value + ` kWh`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TooltipFormat {
    pub prefix: String,
    pub suffix: String,
}

impl TooltipFormat {
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            suffix: suffix.into(),
        }
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: String::new(),
        }
    }

    pub fn format(&self, value: f64) -> String {
        format!("{}{}{}", self.prefix, value, self.suffix)
    }
}

impl ChartOptions {
    /// A single left axis starting at zero
    pub fn single_axis() -> Self {
        Self {
            axes: vec![Axis {
                id: AxisId::Primary,
                position: AxisPosition::Left,
                title: None,
                begin_at_zero: true,
                draw_grid_on_chart_area: true,
            }],
        }
    }

    /// Independent left and right scales; only the left one draws grid lines
    pub fn dual_axis(left_title: impl Into<String>, right_title: impl Into<String>) -> Self {
        Self {
            axes: vec![
                Axis {
                    id: AxisId::Primary,
                    position: AxisPosition::Left,
                    title: Some(left_title.into()),
                    begin_at_zero: true,
                    draw_grid_on_chart_area: true,
                },
                Axis {
                    id: AxisId::Secondary,
                    position: AxisPosition::Right,
                    title: Some(right_title.into()),
                    begin_at_zero: true,
                    draw_grid_on_chart_area: false,
                },
            ],
        }
    }

    pub fn axis(&self, id: AxisId) -> Option<&Axis> {
        self.axes.iter().find(|axis| axis.id == id)
    }
}
