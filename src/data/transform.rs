use log::{debug, info};

use super::annotate::annotate;
use super::model::{EventRange, MarkerStyle, Observation, Series, ViewMode};
use crate::chart::ChartData;
use crate::color::Color;
use crate::config::ChartConfig;

/// Default trailing window, in observations (one week of daily values).
pub const DEFAULT_WINDOW: usize = 7;

// ---------------------------------------------------------------------------
// Moving average
// ---------------------------------------------------------------------------

/// Trailing moving average.
///
/// Output `i` is the mean of `values[max(0, i + 1 - window) ..= i]`, so the
/// window shrinks near the start instead of leaving the first points
/// undefined. A `window` of 0 behaves like 1.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let slice = &values[(i + 1).saturating_sub(window)..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Transformer: observations + mode → chart payload
// ---------------------------------------------------------------------------

/// Pure series transformer. Holds presentation settings only; every call
/// takes the mode and data explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformer {
    pub label: String,
    pub window: usize,
    pub line_color: Color,
    pub marker: MarkerStyle,
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            label: "CPI".to_string(),
            window: DEFAULT_WINDOW,
            line_color: Color::TEAL,
            marker: MarkerStyle::Range,
        }
    }
}

impl Transformer {
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            label: config.label.clone(),
            window: config.window,
            line_color: config.line_color,
            marker: config.marker,
        }
    }

    /// The plotted series for `mode`.
    pub fn series(&self, observations: &[Observation], mode: ViewMode) -> Series {
        let points = match mode {
            ViewMode::Raw => observations.to_vec(),
            ViewMode::MovingAverage => {
                let values: Vec<f64> = observations.iter().map(|o| o.value).collect();
                observations
                    .iter()
                    .zip(moving_average(&values, self.window))
                    .map(|(o, value)| Observation { date: o.date, value })
                    .collect()
            }
        };
        let label = match mode {
            ViewMode::Raw => self.label.clone(),
            ViewMode::MovingAverage => format!("{} ({}-day average)", self.label, self.window.max(1)),
        };
        Series { label, mode, points }
    }

    /// Build the full chart payload: series plus event annotations.
    pub fn transform(&self, observations: &[Observation], mode: ViewMode, events: &[EventRange]) -> ChartData {
        let series = self.series(observations, mode);
        let annotations = annotate(events, observations, self.marker);
        if let (Some(first), Some(last)) = (observations.first(), observations.last()) {
            for (id, annotation) in &annotations {
                let x = annotation.x();
                if x < first.date || x > last.date {
                    debug!("annotation {id} at {x} is outside the plotted dates");
                }
            }
        }
        info!(
            "transformed {} point(s) in {mode} mode with {} annotation(s)",
            series.len(),
            annotations.len()
        );
        ChartData::new(&series, self.line_color, annotations)
    }
}
