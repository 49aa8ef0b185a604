use std::path::Path;

use log::{info, warn};

use crate::chart::ChartData;
use crate::config::ChartConfig;
use crate::data::loader::{load_file, LoadError, Parsed};
use crate::data::model::{EventRange, Observation, ViewMode};
use crate::data::transform::Transformer;

// ---------------------------------------------------------------------------
// Chart state
// ---------------------------------------------------------------------------

/// The full view state, independent of rendering.
///
/// Observations are loaded once and cached; a mode change only re-runs the
/// transformer over the cached data.
#[derive(Debug, Clone)]
pub struct ChartState {
    /// Parsed observations (None until a load succeeds).
    observations: Option<Vec<Observation>>,

    /// Rows dropped by the last successful load.
    pub skipped_rows: usize,

    /// Selected view mode.
    mode: ViewMode,

    /// Events overlaid on the chart.
    events: Vec<EventRange>,

    transformer: Transformer,

    /// Payload for the current mode (cached).
    chart: Option<ChartData>,

    /// Status / error message for the last load.
    pub status_message: Option<String>,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(&ChartConfig::default())
    }
}

impl ChartState {
    pub fn new(config: &ChartConfig) -> Self {
        Self {
            observations: None,
            skipped_rows: 0,
            mode: ViewMode::default(),
            events: config.events.clone(),
            transformer: Transformer::from_config(config),
            chart: None,
            status_message: None,
        }
    }

    /// Load `path` and, on success, replace the cached observations. A
    /// failed load keeps whatever was loaded before.
    pub fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match load_file(path) {
            Ok(parsed) => {
                self.set_observations(parsed);
                Ok(())
            }
            Err(e) => {
                warn!("failed to load {}: {e}", path.display());
                self.status_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Ingest newly parsed data and rebuild the chart for the current mode.
    pub fn set_observations(&mut self, parsed: Parsed) {
        self.skipped_rows = parsed.skipped;
        self.status_message = (parsed.skipped > 0)
            .then(|| format!("{} malformed row(s) skipped", parsed.skipped));
        self.observations = Some(parsed.observations);
        self.rebuild_chart();
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch mode. Re-runs only the transformer; never reloads.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        info!("view mode: {} -> {mode}", self.mode);
        self.mode = mode;
        self.rebuild_chart();
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    pub fn observations(&self) -> Option<&[Observation]> {
        self.observations.as_deref()
    }

    /// Current payload; `None` until data has loaded.
    pub fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    fn rebuild_chart(&mut self) {
        self.chart = self
            .observations
            .as_deref()
            .map(|obs| self.transformer.transform(obs, self.mode, &self.events));
    }
}
