use std::fmt;

use serde::Serialize;

use crate::data::aggregate::{self, CategoryPivot, CorrelationMatrix, TrendTable, YearlyMeans};
use crate::data::error::AggregateError;
use crate::data::model::AirQualityDataset;

// ---------------------------------------------------------------------------
// Chart selection: the four views offered in the sidebar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Distribution,
    Trend,
    YearlyMeans,
    Correlation,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Distribution,
        ChartKind::Trend,
        ChartKind::YearlyMeans,
        ChartKind::Correlation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Distribution => "Distribusi Kualitas Udara",
            ChartKind::Trend => "Tren Kualitas Udara",
            ChartKind::YearlyMeans => "Rata-rata WSPM, RAIN, PM2.5",
            ChartKind::Correlation => "Korelasi PM2.5, WSPM, RAIN",
        }
    }

    /// Whether the view reads the year sliders.
    pub fn uses_year_range(self) -> bool {
        matches!(self, ChartKind::Trend)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of one pipeline run, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartView {
    Distribution(CategoryPivot),
    Trend(TrendTable),
    YearlyMeans(YearlyMeans),
    Correlation(CorrelationMatrix),
}

impl ChartView {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartView::Distribution(_) => ChartKind::Distribution,
            ChartView::Trend(_) => ChartKind::Trend,
            ChartView::YearlyMeans(_) => ChartKind::YearlyMeans,
            ChartView::Correlation(_) => ChartKind::Correlation,
        }
    }
}

/// Run the pipeline operation behind `kind`. The year bounds are only
/// consulted by the trend view.
pub fn build_view(
    kind: ChartKind,
    dataset: &AirQualityDataset,
    start_year: i32,
    end_year: i32,
) -> Result<ChartView, AggregateError> {
    match kind {
        ChartKind::Distribution => {
            aggregate::distribution_by_year(dataset).map(ChartView::Distribution)
        }
        ChartKind::Trend => {
            aggregate::trend_by_range(dataset, start_year, end_year).map(ChartView::Trend)
        }
        ChartKind::YearlyMeans => aggregate::yearly_means(dataset).map(ChartView::YearlyMeans),
        ChartKind::Correlation => {
            aggregate::correlation_matrix(dataset).map(ChartView::Correlation)
        }
    }
}
