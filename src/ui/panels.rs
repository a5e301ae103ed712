use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FillPolicy;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year range and country selection
// ---------------------------------------------------------------------------

/// Render the left selection panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate state below.
    let countries = dataset.domain.countries.clone();
    let (min_year, max_year) = (dataset.domain.min_year, dataset.domain.max_year);

    // ---- Year range ----
    ui.strong("Years");
    let mut lo = state.year_lo;
    if ui
        .add(egui::Slider::new(&mut lo, min_year..=max_year).step_by(1.0).text("from"))
        .changed()
    {
        state.set_year_lo(lo);
    }
    let mut hi = state.year_hi;
    if ui
        .add(egui::Slider::new(&mut hi, min_year..=max_year).step_by(1.0).text("to"))
        .changed()
    {
        state.set_year_hi(hi);
    }
    ui.separator();

    // ---- Countries ----
    ui.strong(format!(
        "Countries  ({}/{})",
        state.selected.len(),
        countries.len()
    ));
    ui.horizontal(|ui: &mut Ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.country_query)
                .hint_text("Search…")
                .desired_width(120.0),
        );
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });

    let query = state.country_query.trim().to_lowercase();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for country in &countries {
                if !query.is_empty() && !country.to_lowercase().contains(&query) {
                    continue;
                }

                let mut text = RichText::new(country);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(country));
                }

                let mut checked = state.selected.contains(country);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_country(country);
                }
            }
        });
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
            let can_export = !state.rows.is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export rows…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} countries, {}–{}, {} rows plotted",
                ds.domain.countries.len(),
                ds.domain.min_year,
                ds.domain.max_year,
                state.rows.len()
            ));
        }

        ui.separator();

        for policy in [FillPolicy::GapFill, FillPolicy::Strict] {
            if ui
                .selectable_label(state.policy == policy, policy.label())
                .clicked()
            {
                state.set_policy(policy);
            }
        }

        ui.separator();

        ui.toggle_value(&mut state.show_table, "Table");

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
        .set_title("Open GDP per capita table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records for {} countries ({}–{}) from {}",
                    dataset.len(),
                    dataset.domain.countries.len(),
                    dataset.domain.min_year,
                    dataset.domain.max_year,
                    path.display()
                );
                state.set_dataset(dataset, None);
            }
            Err(e) => {
                // The current dataset stays in place.
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export plotted rows")
        .add_filter("CSV", &["csv"])
        .set_file_name("gdp_rows.csv")
        .save_file();

    if let Some(path) = file {
        match crate::data::export::export_rows(&path, &state.rows) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", state.rows.len(), path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export rows: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
