mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use app::GdpViewerApp;
use config::ViewerConfig;
use data::filter::CountryInput;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    // Optional first argument: path to a JSON config file.
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = ViewerConfig::load(config_path.as_deref())?;

    let mut state = AppState::new(&config);

    // A dataset that fails to load is fatal; never start with a partial table.
    if let Some(path) = config.dataset_path() {
        let dataset = data::loader::load_file(&path)
            .with_context(|| format!("loading dataset {}", path.display()))?;
        log::info!(
            "Loaded {} records for {} countries ({}–{}) from {}",
            dataset.len(),
            dataset.domain.countries.len(),
            dataset.domain.min_year,
            dataset.domain.max_year,
            path.display()
        );
        let preferred = config
            .default_countries
            .clone()
            .map(CountryInput::into_set);
        state.set_dataset(dataset, preferred);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(config.window_title.clone())
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        options,
        Box::new(move |_cc| Ok(Box::new(GdpViewerApp::new(state)))),
    )
    .map_err(|e| anyhow!("running viewer: {e}"))
}
