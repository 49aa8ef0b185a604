use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::data::model::{EventRange, MarkerStyle};
use crate::data::transform::DEFAULT_WINDOW;
use crate::events::default_event_ranges;

/// Where the data pipeline drops its export.
pub const DEFAULT_SOURCE: &str = "output_hhi_cpi.csv";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Chart configuration
// ---------------------------------------------------------------------------

/// Everything about the chart that is not data. Every field has a default,
/// so a config file only lists what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Data file, `.csv` or `.json`.
    pub source: PathBuf,
    /// Dataset label.
    pub label: String,
    /// Moving-average window, in observations.
    pub window: usize,
    pub line_color: Color,
    pub marker: MarkerStyle,
    pub events: Vec<EventRange>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            label: "CPI".to_string(),
            window: DEFAULT_WINDOW,
            line_color: Color::TEAL,
            marker: MarkerStyle::Range,
            events: default_event_ranges(),
        }
    }
}

impl ChartConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
