use std::sync::Arc;

use crate::chart::{build_view, ChartKind, ChartView};
use crate::color::ChartColors;
use crate::config::DisplayHints;
use crate::data::error::AggregateError;
use crate::data::filter::slider_bounds;
use crate::data::model::{AirQualityDataset, YearRange};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Shared read-only.
    pub dataset: Option<Arc<AirQualityDataset>>,

    /// Path of the loaded dataset, for the top bar.
    pub source_name: Option<String>,

    /// Which of the four charts is shown.
    pub selected: ChartKind,

    /// Trend-view slider values; always inside the data's year bounds.
    pub start_year: i32,
    pub end_year: i32,

    /// Result of the last pipeline run (cached until an input changes).
    pub view: Option<Result<ChartView, AggregateError>>,

    /// Titles, labels and raw colour strings from the config.
    pub hints: DisplayHints,

    /// Colours resolved from `hints`.
    pub colors: ChartColors,

    /// Station name used in titles.
    pub station: String,

    /// Show the aggregated table below the chart.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DisplayHints::default(), "Shunyi".to_string())
    }
}

impl AppState {
    pub fn new(hints: DisplayHints, station: String) -> Self {
        let colors = ChartColors::from_hints(&hints.colors);
        Self {
            dataset: None,
            source_name: None,
            selected: ChartKind::default(),
            start_year: 0,
            end_year: 0,
            view: None,
            hints,
            colors,
            station,
            show_table: false,
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset, reset the sliders and recompute.
    ///
    /// Both sliders start at the earliest year, mirroring a fresh slider
    /// whose default is its minimum.
    pub fn set_dataset(&mut self, dataset: AirQualityDataset, source_name: Option<String>) {
        if let Some(bounds) = slider_bounds(&dataset) {
            self.start_year = bounds.start();
            self.end_year = bounds.start();
        }
        self.dataset = Some(Arc::new(dataset));
        self.source_name = source_name;
        self.status_message = None;
        self.refresh();
    }

    /// Slider bounds for the current dataset.
    pub fn year_bounds(&self) -> Option<YearRange> {
        self.dataset.as_deref().and_then(slider_bounds)
    }

    /// Re-run the selected pipeline operation against the dataset.
    pub fn refresh(&mut self) {
        self.view = self.dataset.as_deref().map(|ds| {
            let result = build_view(self.selected, ds, self.start_year, self.end_year);
            match &result {
                Ok(_) => log::debug!(
                    "Recomputed '{}' ({}..={})",
                    self.selected,
                    self.start_year,
                    self.end_year
                ),
                Err(e) => log::warn!("Cannot build '{}': {e}", self.selected),
            }
            result
        });
    }

    pub fn select_chart(&mut self, kind: ChartKind) {
        if self.selected != kind {
            self.selected = kind;
            self.refresh();
        }
    }

    pub fn set_start_year(&mut self, year: i32) {
        let year = self.clamp_year(year);
        if self.start_year != year {
            self.start_year = year;
            self.refresh();
        }
    }

    pub fn set_end_year(&mut self, year: i32) {
        let year = self.clamp_year(year);
        if self.end_year != year {
            self.end_year = year;
            self.refresh();
        }
    }

    fn clamp_year(&self, year: i32) -> i32 {
        self.year_bounds()
            .map(|b| b.clamp_year(year))
            .unwrap_or(year)
    }
}
