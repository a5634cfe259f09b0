use eframe::egui;

use crate::export;
use crate::state::AppState;
use crate::ui::{chart, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct SalesDashApp {
    pub state: AppState,
}

impl SalesDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Pick up the screenshot requested by the chart export dialog and
    /// write it to the path the user chose.
    fn handle_screenshot_events(&mut self, ctx: &egui::Context) {
        if self.state.pending_chart_export.is_none() {
            return;
        }
        let image = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(image) = image else { return };
        let Some(path) = self.state.pending_chart_export.take() else {
            return;
        };
        match export::save_png(&image, &path) {
            Ok(()) => {
                self.state.status_message = Some(format!("Chart saved to {}", path.display()));
            }
            Err(e) => {
                log::error!("failed to export chart: {e:#}");
                self.state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

impl eframe::App for SalesDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_screenshot_events(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart ----
        egui::CentralPanel::default().show(ctx, |ui| {
            chart::sales_chart(ui, &self.state);
        });
    }
}
