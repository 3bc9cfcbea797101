use eframe::egui::{self, Color32, RichText, Ui};

use crate::chart::ChartKind;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – chart selector and year filter
// ---------------------------------------------------------------------------

/// Render the left sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dashboard Kualitas Udara");
    ui.separator();

    ui.strong("Pilih Chart");
    let mut chosen = state.selected;
    egui::ComboBox::from_id_salt("chart_select")
        .selected_text(chosen.label())
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut chosen, kind, kind.label());
            }
        });
    state.select_chart(chosen);

    if !chosen.uses_year_range() {
        return;
    }

    ui.add_space(8.0);
    ui.heading("Filter Data");
    ui.separator();

    let Some(bounds) = state.year_bounds() else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut start = state.start_year;
    ui.label("Select start year");
    ui.add(egui::Slider::new(&mut start, bounds.start()..=bounds.end()));
    state.set_start_year(start);

    let mut end = state.end_year;
    ui.label("Select end year");
    ui.add(egui::Slider::new(&mut end, bounds.start()..=bounds.end()));
    state.set_end_year(end);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let span = ds
                .year_bounds()
                .map(|b| format!(", {b}"))
                .unwrap_or_default();
            let source = state.source_name.as_deref().unwrap_or("dataset");
            ui.label(format!("{source}: {} observations{span}", ds.len()));
        }

        ui.separator();

        if ui.selectable_label(state.show_table, "Data table").clicked() {
            state.show_table = !state.show_table;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open air-quality data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
                state.set_dataset(dataset, name);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
