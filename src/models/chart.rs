//! Chart payloads handed to an external renderer.

use serde::{Deserialize, Serialize};

/// One named line or bar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Labels along the category axis plus one value per label in each series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl ChartData {
    pub fn new(labels: Vec<String>) -> Self {
        Self {
            labels,
            series: Vec::new(),
        }
    }

    pub fn with_series(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.series.push(Series {
            name: name.into(),
            values,
        });
        self
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

/// A chart in one of the shapes the renderer understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Bar(ChartData),
    Line(ChartData),
    Scatter { points: Vec<ScatterPoint> },
    NoData { message: String },
}

impl Chart {
    pub fn no_data() -> Self {
        Chart::NoData {
            message: "No data available".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Chart::NoData { .. })
    }
}
