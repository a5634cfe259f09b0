mod app;
mod color;
mod data;
mod export;
mod state;
mod ui;

use std::path::Path;

use app::SalesDashApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional positional argument: path to a data file to load at startup.
    let mut state = AppState::default();
    if let Some(path) = std::env::args().nth(1) {
        match data::loader::load(Path::new(&path)) {
            Ok(table) => {
                log::info!("loaded {} records from {path}", table.len());
                state.set_table(table);
            }
            Err(e) => {
                // Fatal to the session: show the message, render no data.
                log::error!("failed to load {path}: {e}");
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(SalesDashApp::new(state)))),
    )
}
