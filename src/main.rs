use std::path::PathBuf;

use eframe::egui;
use rusty_dashboard::app::DashboardApp;
use rusty_dashboard::settings::Settings;

fn main() -> eframe::Result {
    env_logger::init();

    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(settings_path.as_deref());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(settings.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(settings)))),
    )
}
