use eframe::egui::{self, Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// GDP plot (central panel)
// ---------------------------------------------------------------------------

/// Render the GDP-per-capita line chart in the central panel.
pub fn gdp_plot(ui: &mut Ui, state: &AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view GDP per capita  (File → Open…)");
        });
        return;
    }

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("GDP Per Capita Over Time");
    });

    let mut plot = Plot::new("gdp_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("GDP per Capita")
        .x_axis_formatter(|mark, _range| format!("{:.0}", mark.value))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    // Padding is already part of the computed bounds.
    if let Some((lo, hi)) = state.y_bounds {
        plot = plot
            .include_y(lo)
            .include_y(hi)
            .set_margin_fraction(egui::vec2(0.05, 0.0));
    }

    plot.show(ui, |plot_ui| {
        for series in &state.series {
            let color = state
                .color_map
                .as_ref()
                .map(|cm| cm.color_for(&series.country))
                .unwrap_or(Color32::LIGHT_BLUE);

            for segment in &series.segments {
                // A lone point draws no line; mark it instead.
                if segment.len() == 1 {
                    plot_ui.points(
                        Points::new(PlotPoints::new(segment.clone()))
                            .name(&series.country)
                            .color(color)
                            .radius(3.0),
                    );
                    continue;
                }
                let line = Line::new(PlotPoints::new(segment.clone()))
                    .name(&series.country)
                    .color(color)
                    .width(1.5);

                plot_ui.line(line);
            }
        }
    });
}
