use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};

use crate::chart::ChartView;
use crate::color::{contrast_text, ChartColors};
use crate::config::{render_title, DisplayHints};
use crate::data::aggregate::{
    CategoryPivot, CorrelationMatrix, TrendTable, VariableMeans, YearlyMeans,
};
use crate::data::model::{Variable, CATEGORY_ORDER};
use crate::state::AppState;

const BAR_OUTLINE: Color32 = Color32::from_gray(90);

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the selected chart, or the reason it cannot be drawn.
pub fn chart_panel(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the dashboard  (File → Open…)");
        });
        return;
    };

    let view = match view {
        Ok(view) => view,
        Err(e) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                let message = format!("Tidak dapat menampilkan chart: {e}");
                ui.label(RichText::new(message).color(Color32::RED));
            });
            return;
        }
    };

    let hints = &state.hints;
    let colors = &state.colors;
    let station = state.station.as_str();

    match view {
        ChartView::Distribution(pivot) => distribution_chart(ui, pivot, hints, colors, station),
        ChartView::Trend(trend) => trend_chart(ui, trend, hints, colors, station),
        ChartView::YearlyMeans(means) => means_charts(ui, means, hints, colors, station),
        ChartView::Correlation(matrix) => correlation_heatmap(ui, matrix, hints, colors, station),
    }
}

fn station_title(template: &str, station: &str) -> String {
    render_title(template, &[("station", station.to_string())])
}

/// Years are whole numbers; hide the fractional grid marks.
fn year_formatter(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    if mark.value.fract().abs() < f64::EPSILON {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}

/// Category legend with swatches. The plot legend alone hides the white
/// "Baik" entry on a light background.
fn legend_heading(ui: &mut Ui, hints: &DisplayHints, colors: &ChartColors) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label(RichText::new(&hints.labels.category).weak());
        for (label, color) in colors.legend_entries() {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
            ui.painter().rect_filled(rect, 2.0, BAR_OUTLINE);
            ui.painter().rect_filled(rect.shrink(1.0), 2.0, color);
            ui.label(label);
        }
    });
}

// ---------------------------------------------------------------------------
// Distribution: grouped bars per year
// ---------------------------------------------------------------------------

fn distribution_chart(
    ui: &mut Ui,
    pivot: &CategoryPivot,
    hints: &DisplayHints,
    colors: &ChartColors,
    station: &str,
) {
    ui.heading(station_title(&hints.titles.distribution, station));
    legend_heading(ui, hints, colors);

    let group_width = 0.8;
    let bar_width = group_width / CATEGORY_ORDER.len() as f64;

    let charts: Vec<BarChart> = CATEGORY_ORDER
        .iter()
        .enumerate()
        .map(|(i, &category)| {
            let offset = (i as f64 - (CATEGORY_ORDER.len() as f64 - 1.0) / 2.0) * bar_width;
            let bars = pivot
                .years()
                .iter()
                .zip(pivot.column(category))
                .map(|(&year, count)| {
                    Bar::new(year as f64 + offset, count as f64)
                        .width(bar_width)
                        .fill(colors.category(category))
                        .stroke(Stroke::new(1.0, BAR_OUTLINE))
                        .name(format!("{category} {year}"))
                })
                .collect();
            BarChart::new(bars)
                .name(category.label())
                .color(colors.category(category))
        })
        .collect();

    Plot::new("distribution_plot")
        .legend(Legend::default())
        .x_axis_label(hints.labels.year.as_str())
        .y_axis_label(hints.labels.count.as_str())
        .x_axis_formatter(year_formatter)
        .allow_drag(true)
        .allow_zoom(true)
        .allow_scroll(true)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Trend: one line with markers per category
// ---------------------------------------------------------------------------

fn trend_chart(
    ui: &mut Ui,
    trend: &TrendTable,
    hints: &DisplayHints,
    colors: &ChartColors,
    station: &str,
) {
    let title = render_title(
        &hints.titles.trend,
        &[
            ("station", station.to_string()),
            ("start", trend.range.start().to_string()),
            ("end", trend.range.end().to_string()),
        ],
    );
    ui.heading(title);
    legend_heading(ui, hints, colors);

    Plot::new("trend_plot")
        .legend(Legend::default())
        .x_axis_label(hints.labels.year.as_str())
        .y_axis_label(hints.labels.count.as_str())
        .x_axis_formatter(year_formatter)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for category in CATEGORY_ORDER {
                let points: Vec<[f64; 2]> = trend
                    .series(category)
                    .map(|p| [p.year as f64, p.count as f64])
                    .collect();
                let color = colors.category(category);

                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(category.label())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category.label())
                        .color(color)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Yearly means: three bar charts, peak year highlighted
// ---------------------------------------------------------------------------

fn means_charts(
    ui: &mut Ui,
    means: &YearlyMeans,
    hints: &DisplayHints,
    colors: &ChartColors,
    station: &str,
) {
    let n = means.series.len().max(1) as f32;
    let spacing = ui.spacing().item_spacing.y;
    // Heading height is an estimate; the plots take whatever is left.
    let plot_height = ((ui.available_height() - n * (spacing + 28.0)) / n).max(120.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for variable in Variable::MEANS_ORDER {
                let Some(series) = means.get(variable) else {
                    continue;
                };
                ui.heading(station_title(hints.titles.means(variable), station));
                means_chart(ui, series, hints, colors, plot_height);
            }
        });
}

fn means_chart(
    ui: &mut Ui,
    series: &VariableMeans,
    hints: &DisplayHints,
    colors: &ChartColors,
    height: f32,
) {
    let bars: Vec<Bar> = series
        .means
        .iter()
        .map(|&(year, mean)| {
            Bar::new(year as f64, mean)
                .width(0.7)
                .fill(colors.bar(year == series.peak.year))
                .name(format!("{year}"))
        })
        .collect();

    Plot::new(format!("means_plot_{}", series.variable.column()))
        .height(height)
        .x_axis_label(hints.labels.year.as_str())
        .y_axis_label(hints.labels.means(series.variable))
        .x_axis_formatter(year_formatter)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(series.variable.column()));
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn correlation_heatmap(
    ui: &mut Ui,
    matrix: &CorrelationMatrix,
    hints: &DisplayHints,
    colors: &ChartColors,
    station: &str,
) {
    ui.heading(station_title(&hints.titles.correlation, station));

    let names: Vec<&'static str> = matrix.variables.iter().map(|v| v.column()).collect();
    let n = names.len();
    // Row 0 is drawn at the top.
    let y_of = move |row: usize| (n - 1 - row) as f64;

    let x_names = names.clone();
    let y_names = names;
    let label_at = |names: &[&'static str], index: Option<usize>| -> String {
        index
            .and_then(|i| names.get(i))
            .map(|s| s.to_string())
            .unwrap_or_default()
    };

    colorbar(ui, colors, &hints.labels.correlation);

    Plot::new("correlation_plot")
        .data_aspect(1.0)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_label(hints.labels.variable.as_str())
        .y_axis_label(hints.labels.variable.as_str())
        .x_axis_formatter(move |mark, _range| {
            let idx = (mark.value.fract().abs() < f64::EPSILON && mark.value >= 0.0)
                .then_some(mark.value as usize);
            label_at(x_names.as_slice(), idx)
        })
        .y_axis_formatter(move |mark, _range| {
            let idx = (mark.value.fract().abs() < f64::EPSILON && mark.value >= 0.0)
                .then(|| (n - 1).checked_sub(mark.value as usize))
                .flatten();
            label_at(y_names.as_slice(), idx)
        })
        .show(ui, |plot_ui| {
            for (row, row_values) in matrix.values.iter().enumerate() {
                for (col, &value) in row_values.iter().enumerate() {
                    let (cx, cy) = (col as f64, y_of(row));
                    let fill = colors.heatmap.color_at(value);
                    let square = vec![
                        [cx - 0.5, cy - 0.5],
                        [cx + 0.5, cy - 0.5],
                        [cx + 0.5, cy + 0.5],
                        [cx - 0.5, cy + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(square))
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::from_gray(200))),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(cx, cy),
                        RichText::new(format_correlation(value))
                            .color(contrast_text(fill))
                            .strong(),
                    ));
                }
            }
        });
}

/// Two decimals, or "n/a" for an undefined coefficient.
pub fn format_correlation(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.2}")
    }
}

/// Horizontal strip from -1 to +1 with the scale colours.
fn colorbar(ui: &mut Ui, colors: &ChartColors, label: &str) {
    const STEPS: usize = 40;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        ui.label("-1");
        let (rect, _) = ui.allocate_exact_size(egui::vec2(200.0, 12.0), Sense::hover());
        let step_w = rect.width() / STEPS as f32;
        for i in 0..STEPS {
            let t = i as f64 / (STEPS - 1) as f64 * 2.0 - 1.0;
            let x = rect.left() + i as f32 * step_w;
            let cell = egui::Rect::from_min_size(
                egui::pos2(x, rect.top()),
                egui::vec2(step_w + 0.5, rect.height()),
            );
            ui.painter().rect_filled(cell, 0.0, colors.heatmap.color_at(t));
        }
        ui.label("1");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_correlation() {
        assert_eq!(format_correlation(1.0), "1.00");
        assert_eq!(format_correlation(-0.456), "-0.46");
        assert_eq!(format_correlation(f64::NAN), "n/a");
    }

    #[test]
    fn test_station_title() {
        assert_eq!(
            station_title("Heatmap di Stasiun {station}", "Shunyi"),
            "Heatmap di Stasiun Shunyi"
        );
    }
}
