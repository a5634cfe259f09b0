use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, LineStyle, Plot};

use crate::color;
use crate::data::engine::SeriesResult;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Sales bar chart (central panel)
// ---------------------------------------------------------------------------

/// Render the aggregated series as a bar chart with the mean-of-groups
/// drawn as a dashed horizontal reference line.
pub fn sales_chart(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a spreadsheet to view sales  (File → Open…)");
        });
        return;
    }

    let series = match &state.series {
        SeriesResult::Series(series) => series,
        SeriesResult::NoData => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("No data for this filter combination.");
            });
            return;
        }
    };

    if let Some(title) = state.chart_title() {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.heading(title);
        });
    }

    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();
    let shades = color::normalized(&values);

    let bars: Vec<Bar> = series
        .points
        .iter()
        .zip(shades.iter())
        .enumerate()
        .map(|(i, (point, &shade))| {
            Bar::new(i as f64, point.value)
                .name(&point.group)
                .fill(color::value_color(shade))
                .width(0.7)
        })
        .collect();

    let labels: Vec<String> = series.points.iter().map(|p| p.group.clone()).collect();
    let metric = state
        .selection
        .as_ref()
        .map(|s| s.metric.clone())
        .unwrap_or_default();

    Plot::new("sales_chart")
        .legend(Legend::default())
        .y_axis_label(metric)
        .x_axis_formatter(move |mark, _range| {
            // Bars sit at integer positions; suppress fractional grid marks.
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 0.05 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
            plot_ui.hline(
                HLine::new(series.overall_mean)
                    .name("Mean of groups")
                    .color(Color32::RED)
                    .width(2.5)
                    .style(LineStyle::dashed_loose()),
            );
        });
}
