use eframe::egui::{self, Color32, ScrollArea, Ui};

use crate::settings::Settings;
use crate::state::{AppState, DatasetStatus};
use crate::ui::{heatmap, panels, plot, tables};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: AppState::new(settings),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: upload + chart configuration ----
        egui::SidePanel::left("sidebar")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    match state.status() {
        DatasetStatus::NoFile => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Please upload a dataset through the left sidebar to begin analysis.");
            });
            return;
        }
        DatasetStatus::Failed {
            error,
            previous: None,
        } => {
            ui.colored_label(Color32::RED, error.to_string());
            return;
        }
        DatasetStatus::Failed { .. } | DatasetStatus::Loaded(_) => {}
    }

    ui.heading("Dataset Analysis Dashboard");
    ui.separator();

    if let Some(dataset) = state.dataset() {
        ui.strong("Dataset Preview");
        tables::preview(ui, dataset, state.settings.preview_rows);

        egui::CollapsingHeader::new("Dataset Overview")
            .default_open(false)
            .show(ui, |ui: &mut Ui| tables::overview_panel(ui, dataset));
    }

    egui::CollapsingHeader::new("Summary Statistics")
        .default_open(false)
        .show(ui, |ui: &mut Ui| tables::summary_panel(ui, state));

    ui.separator();
    ui.heading("Data Visualization");
    plot::chart_view(ui, state);

    ui.separator();
    ui.heading("Correlation Matrix");
    heatmap::correlation_view(ui, state);

    ui.separator();
    ui.checkbox(&mut state.show_raw, "Show Full Dataset");
    if state.show_raw {
        if let Some(dataset) = state.dataset() {
            ui.strong("Raw Data");
            tables::raw_data(ui, dataset);
        }
    }
}
