use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::data::filter::{CountryInput, FillPolicy};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "gdp-viewer.json";

/// Dataset opened at startup when the config does not name one.
pub const DEFAULT_DATA_PATH: &str = "data/gdp_pcap.csv";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Startup settings, read from an optional JSON file.
///
/// ```json
/// {
///   "data_path": "data/gdp_pcap.csv",
///   "fill_policy": "gap_fill",
///   "axis_padding": 0.1,
///   "default_countries": ["Chile", "Peru"],
///   "window_title": "Gapminder GDP Per Capita Analysis"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub data_path: Option<PathBuf>,
    pub fill_policy: FillPolicy,
    /// Fraction of the value span added above and below the plotted values.
    pub axis_padding: f64,
    /// A single country or a list; the first country when absent.
    pub default_countries: Option<CountryInput>,
    pub window_title: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            fill_policy: FillPolicy::default(),
            axis_padding: 0.1,
            default_countries: None,
            window_title: "Gapminder GDP Per Capita Analysis".to_string(),
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a JSON config document.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(text).context("parsing config JSON")?;
        if !config.axis_padding.is_finite() || config.axis_padding < 0.0 {
            bail!(
                "axis_padding must be a non-negative number, got {}",
                config.axis_padding
            );
        }
        Ok(config)
    }

    /// Read the config from `explicit` if given, else from
    /// [`DEFAULT_CONFIG_FILE`] if it exists, else use defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    log::info!("No {DEFAULT_CONFIG_FILE} found, using default settings");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config =
            Self::from_json(&text).with_context(|| format!("in config {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Dataset to open at startup, if any.
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.data_path.clone().or_else(|| {
            let fallback = PathBuf::from(DEFAULT_DATA_PATH);
            fallback.is_file().then_some(fallback)
        })
    }
}
