use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::engine::{Filter, SeriesResult};
use crate::data::model::{MONTH_COLUMN, STATE_COLUMN};
use crate::export;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: state, month, metric, and dimension
/// selectors, all populated from the loaded table.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the widgets.
    let states = table.labels(STATE_COLUMN);
    let months = table.labels(MONTH_COLUMN);
    let metrics = table.metric_columns.clone();
    let dimensions = table.categorical_columns.clone();

    let Some(selection) = state.selection.clone() else {
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- State ----
            ui.strong("State");
            if let Some(filter) =
                filter_combo(ui, "state_filter", &selection.state, "All states", &states)
            {
                state.set_state_filter(filter);
            }
            ui.separator();

            // ---- Month ----
            ui.strong("Month");
            if let Some(filter) =
                filter_combo(ui, "month_filter", &selection.month, "All months", &months)
            {
                state.set_month_filter(filter);
            }
            ui.separator();

            // ---- Metric ----
            ui.strong("Metric");
            if let Some(metric) = column_combo(ui, "metric", &selection.metric, &metrics) {
                state.set_metric(metric);
            }
            ui.separator();

            // ---- Dimension ----
            ui.strong("Dimension");
            if let Some(dimension) =
                column_combo(ui, "dimension", &selection.dimension, &dimensions)
            {
                state.set_dimension(dimension);
            }
        });
}

/// Combo box over a categorical column's labels with an "all" sentinel
/// entry on top. Returns the newly picked filter, if any.
fn filter_combo(
    ui: &mut Ui,
    id: &str,
    current: &Filter,
    all_label: &str,
    labels: &[String],
) -> Option<Filter> {
    let selected_text = match current {
        Filter::All => all_label.to_string(),
        Filter::Only(v) => v.clone(),
    };

    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected_text)
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(*current == Filter::All, all_label)
                .clicked()
            {
                picked = Some(Filter::All);
            }
            for label in labels {
                let is_current = matches!(current, Filter::Only(v) if v == label);
                if ui.selectable_label(is_current, label).clicked() {
                    picked = Some(Filter::Only(label.clone()));
                }
            }
        });
    picked
}

/// Combo box over column names (metric or dimension selector).
fn column_combo(ui: &mut Ui, id: &str, current: &str, columns: &[String]) -> Option<String> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for col in columns {
                if ui.selectable_label(current == col, col).clicked() {
                    picked = Some(col.clone());
                }
            }
        });
    picked
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
            ui.separator();
            let exportable = matches!(state.series, SeriesResult::Series(_));
            if ui
                .add_enabled(exportable, egui::Button::new("Export chart as PNG…"))
                .clicked()
            {
                export_chart_dialog(ui, state);
                ui.close_menu();
            }
            if ui
                .add_enabled(exportable, egui::Button::new("Export series as CSV…"))
                .clicked()
            {
                export_series_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let shown = match &state.series {
                SeriesResult::Series(series) => series.points.len(),
                SeriesResult::NoData => 0,
            };
            ui.label(format!("{} records loaded, {} groups shown", table.len(), shown));
        }

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["xlsx", "xls", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load(&path) {
            Ok(table) => {
                log::info!(
                    "loaded {} records with metrics {:?}",
                    table.len(),
                    table.metric_columns
                );
                state.set_table(table);
            }
            Err(e) => {
                log::error!("failed to load file: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Pick a target path, then ask egui for a screenshot of the viewport; the
/// app loop saves the image when the screenshot event arrives next frame.
fn export_chart_dialog(ui: &Ui, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart")
        .set_file_name("sales_chart.png")
        .add_filter("PNG image", &["png"])
        .save_file();

    if let Some(path) = file {
        state.pending_chart_export = Some(path);
        ui.ctx()
            .send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
    }
}

fn export_series_dialog(state: &mut AppState) {
    let SeriesResult::Series(series) = state.series.clone() else {
        return;
    };
    let file = rfd::FileDialog::new()
        .set_title("Export series")
        .set_file_name("sales_series.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match export::write_series_csv(&series, &path) {
            Ok(()) => {
                state.status_message = Some(format!("Series saved to {}", path.display()));
            }
            Err(e) => {
                log::error!("failed to export series: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
