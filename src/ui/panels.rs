use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::chart::ChartKind;
use crate::data::upload::FileFormat;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – upload and chart configuration
// ---------------------------------------------------------------------------

/// Render the left sidebar.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload your dataset");
    ui.separator();

    if ui.button("Choose a CSV, XLS, or XLSX file…").clicked() {
        open_file_dialog(state);
    }
    if let Some(name) = &state.file_name {
        ui.label(RichText::new(name).monospace());
    }

    ui.add_space(12.0);
    ui.heading("Chart Configuration");
    ui.separator();

    if state.dataset().is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let partition = state.partition();

    ui.strong("Select Chart Type");
    let current_kind = state.chart.kind;
    egui::ComboBox::from_id_salt("chart_kind")
        .selected_text(current_kind.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                if ui
                    .selectable_label(current_kind == kind, kind.to_string())
                    .clicked()
                {
                    state.set_chart_kind(kind);
                }
            }
        });

    let x_candidates = state.chart.x_candidates(&partition).to_vec();
    let y_candidates = state.chart.y_candidates(&partition).to_vec();

    if x_candidates.is_empty() {
        ui.colored_label(Color32::YELLOW, "No numeric columns available");
        return;
    }

    let x_label = if state.chart.kind.has_y() {
        "Select X Column"
    } else {
        "Select Column"
    };
    ui.strong(x_label);
    let current_x = state.chart.x.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("chart_x")
        .selected_text(&current_x)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &x_candidates {
                if ui.selectable_label(current_x == *col, col).clicked() {
                    state.set_chart_x(col.clone());
                }
            }
        });

    if state.chart.kind.has_y() {
        ui.strong("Select Y Column");
        let current_y = state.chart.y.clone().unwrap_or_default();
        egui::ComboBox::from_id_salt("chart_y")
            .selected_text(&current_y)
            .show_ui(ui, |ui: &mut Ui| {
                for col in &y_candidates {
                    if ui.selectable_label(current_y == *col, col).clicked() {
                        state.set_chart_y(col.clone());
                    }
                }
            });
    }
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = state.dataset() {
            ui.label(format!("{} rows, {} columns", ds.n_rows(), ds.n_columns()));
        }

        if let Some(err) = state.last_error() {
            ui.separator();
            ui.label(RichText::new(err.to_string()).color(Color32::RED));
            if ui.small_button("✕").clicked() {
                state.dismiss_error();
            }
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open dataset")
        .add_filter("Supported files", &FileFormat::EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
