use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart::ChartView;
use crate::config::DisplayHints;
use crate::data::model::{Variable, CATEGORY_ORDER};
use crate::state::AppState;
use crate::ui::charts::format_correlation;

/// A view flattened into text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TextTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Flatten a chart view into the table shown under the chart.
pub fn text_table(view: &ChartView, hints: &DisplayHints) -> TextTable {
    let labels = &hints.labels;
    match view {
        ChartView::Distribution(pivot) => TextTable {
            header: std::iter::once(labels.year.clone())
                .chain(CATEGORY_ORDER.iter().map(|c| c.label().to_string()))
                .collect(),
            rows: pivot
                .rows()
                .map(|(year, counts)| {
                    std::iter::once(year.to_string())
                        .chain(counts.iter().map(|c| c.to_string()))
                        .collect()
                })
                .chain(std::iter::once(
                    std::iter::once("Total".to_string())
                        .chain(CATEGORY_ORDER.iter().map(|&c| pivot.column_total(c).to_string()))
                        .collect(),
                ))
                .collect(),
        },
        ChartView::Trend(trend) => TextTable {
            header: vec![labels.year.clone(), labels.category.clone(), labels.count.clone()],
            rows: trend
                .points
                .iter()
                .map(|p| vec![p.year.to_string(), p.category.to_string(), p.count.to_string()])
                .collect(),
        },
        ChartView::YearlyMeans(means) => {
            let years: Vec<i32> = means
                .series
                .first()
                .map(|s| s.means.iter().map(|(y, _)| *y).collect())
                .unwrap_or_default();
            TextTable {
                header: std::iter::once(labels.year.clone())
                    .chain(means.series.iter().map(|s| s.variable.column().to_string()))
                    .collect(),
                rows: years
                    .iter()
                    .enumerate()
                    .map(|(i, year)| {
                        std::iter::once(year.to_string())
                            .chain(means.series.iter().map(|s| {
                                let (_, mean) = s.means[i];
                                if s.peak.year == *year {
                                    format!("{mean:.3} *")
                                } else {
                                    format!("{mean:.3}")
                                }
                            }))
                            .collect()
                    })
                    .collect(),
            }
        }
        ChartView::Correlation(matrix) => TextTable {
            header: std::iter::once(labels.variable.clone())
                .chain(matrix.variables.iter().map(|v| v.column().to_string()))
                .collect(),
            rows: Variable::ALL
                .iter()
                .map(|&a| {
                    std::iter::once(a.column().to_string())
                        .chain(Variable::ALL.iter().map(|&b| format_correlation(matrix.get(a, b))))
                        .collect()
                })
                .collect(),
        },
    }
}

// ---------------------------------------------------------------------------
// Bottom panel
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(Ok(view)) = &state.view else {
        ui.label("No table for the current selection.");
        return;
    };
    let table = text_table(view, &state.hints);
    ui.strong(view.kind().label());

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(70.0), table.header.len())
        .header(20.0, |mut header| {
            for name in &table.header {
                header.col(|ui: &mut Ui| {
                    ui.label(RichText::new(name).strong());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.rows.len(), |mut row| {
                let cells = &table.rows[row.index()];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{build_view, ChartKind};
    use crate::data::model::{AirQualityDataset, Category, Observation};

    fn obs(year: i32, pm25: f64, wspm: f64, rain: f64, category: Category) -> Observation {
        Observation {
            year,
            pm25,
            wspm,
            rain,
            category,
        }
    }

    fn dataset() -> AirQualityDataset {
        AirQualityDataset::from_observations(vec![
            obs(2013, 10.0, 1.0, 0.0, Category::Baik),
            obs(2013, 50.0, 2.0, 0.5, Category::Sedang),
            obs(2014, 90.0, 0.5, 0.0, Category::Berbahaya),
        ])
    }

    fn table(kind: ChartKind) -> TextTable {
        let view = build_view(kind, &dataset(), 2013, 2014).unwrap();
        text_table(&view, &DisplayHints::default())
    }

    #[test]
    fn test_distribution_table() {
        let t = table(ChartKind::Distribution);
        assert_eq!(t.header[0], "Tahun");
        assert_eq!(t.header.len(), 6);
        assert_eq!(t.rows[0], vec!["2013", "1", "1", "0", "0", "0"]);
        assert_eq!(t.rows[1], vec!["2014", "0", "0", "0", "0", "1"]);
        assert_eq!(t.rows[2], vec!["Total", "1", "1", "0", "0", "1"]);
    }

    #[test]
    fn test_trend_table_is_long_form() {
        let t = table(ChartKind::Trend);
        assert_eq!(t.header, vec!["Tahun", "Kategori Kualitas Udara", "Jumlah"]);
        assert_eq!(t.rows.len(), 10);
        assert_eq!(t.rows[9], vec!["2014", "Berbahaya", "1"]);
    }

    #[test]
    fn test_means_table_marks_peak() {
        let t = table(ChartKind::YearlyMeans);
        assert_eq!(t.header, vec!["Tahun", "WSPM", "RAIN", "PM2.5"]);
        assert_eq!(t.rows[0], vec!["2013", "1.500 *", "0.250 *", "30.000"]);
        assert_eq!(t.rows[1], vec!["2014", "0.500", "0.000", "90.000 *"]);
    }

    #[test]
    fn test_correlation_table() {
        let t = table(ChartKind::Correlation);
        assert_eq!(t.header, vec!["Variable", "PM2.5", "WSPM", "RAIN"]);
        assert_eq!(t.rows.len(), 3);
        assert_eq!(t.rows[0][1], "1.00");
    }
}
