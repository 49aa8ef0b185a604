use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::color::Color;
use crate::data::annotate::Annotation;
use crate::data::model::{Series, ViewMode};

// ---------------------------------------------------------------------------
// Chart payload (what the renderer consumes)
// ---------------------------------------------------------------------------

/// One plotted line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub border_color: Color,
    pub fill: bool,
    pub mode: ViewMode,
}

/// `{ labels, datasets, annotations }` – dates on the x axis, one dataset,
/// and the overlay annotations keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<NaiveDate>,
    pub datasets: Vec<Dataset>,
    pub annotations: BTreeMap<String, Annotation>,
}

impl ChartData {
    pub fn new(series: &Series, line_color: Color, annotations: BTreeMap<String, Annotation>) -> Self {
        Self {
            labels: series.dates().collect(),
            datasets: vec![Dataset {
                label: series.label.clone(),
                data: series.values().collect(),
                border_color: line_color,
                fill: false,
                mode: series.mode,
            }],
            annotations,
        }
    }

    /// Whether there is anything to plot.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
