//! CPI chart data: parse a static CSV/JSON export, derive the raw or
//! moving-average series, and map named date ranges to chart annotations.
//!
//! The result is a [`chart::ChartData`] payload for an external renderer.

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod events;
pub mod state;

pub use chart::ChartData;
pub use config::ChartConfig;
pub use data::loader::{load_file, parse_csv, parse_json, LoadError, Parsed};
pub use data::model::{EventRange, MarkerStyle, Observation, Series, ViewMode};
pub use data::transform::{moving_average, Transformer};
pub use state::ChartState;
