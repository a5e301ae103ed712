use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::config::ViewerConfig;
use crate::data::filter::{FillPolicy, Selection, YearRange, filter_rows, y_axis_range};
use crate::data::model::{GdpDataset, LongRecord, Year};
use crate::data::series::{Series, build_series};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<GdpDataset>,

    /// Countries ticked in the side panel.
    pub selected: BTreeSet<String>,

    /// Year slider positions; the panel keeps `year_lo <= year_hi`.
    pub year_lo: Year,
    pub year_hi: Year,

    /// Missing-value policy applied to the plotted rows.
    pub policy: FillPolicy,

    /// Fraction of the value span added around the y-axis.
    pub axis_padding: f64,

    /// Rows passing the current selection (cached).
    pub rows: Vec<LongRecord>,

    /// Per-country lines built from `rows` (cached).
    pub series: Vec<Series>,

    /// Y-axis bounds for `rows`; None lets the plot choose.
    pub y_bounds: Option<(f64, f64)>,

    /// Colour per country of the loaded dataset.
    pub color_map: Option<ColorMap>,

    /// Text typed into the country search box.
    pub country_query: String,

    /// Whether the table of plotted rows is shown.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selected: BTreeSet::new(),
            year_lo: 0,
            year_hi: 0,
            policy: FillPolicy::default(),
            axis_padding: 0.1,
            rows: Vec::new(),
            series: Vec::new(),
            y_bounds: None,
            color_map: None,
            country_query: String::new(),
            show_table: false,
            status_message: None,
        }
    }
}

impl AppState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            policy: config.fill_policy,
            axis_padding: config.axis_padding,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset: full year range, initial countries,
    /// colours.
    ///
    /// `preferred` names the countries to start with; names missing from
    /// the dataset are dropped. Without a preference the first country is
    /// selected.
    pub fn set_dataset(&mut self, dataset: GdpDataset, preferred: Option<BTreeSet<String>>) {
        let domain = &dataset.domain;

        self.selected = match preferred {
            Some(wanted) => {
                let (known, unknown): (BTreeSet<String>, BTreeSet<String>) = wanted
                    .into_iter()
                    .partition(|c| domain.countries.contains(c));
                if !unknown.is_empty() {
                    log::warn!("Ignoring countries not in the dataset: {unknown:?}");
                }
                known
            }
            None => domain.countries.first().cloned().into_iter().collect(),
        };

        let years = YearRange::full(domain);
        self.year_lo = years.lo();
        self.year_hi = years.hi();
        self.color_map = Some(ColorMap::new(&domain.countries));
        self.country_query.clear();

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// The current widget values as a filter selection.
    pub fn selection(&self) -> Option<Selection> {
        let years = match YearRange::new(self.year_lo, self.year_hi) {
            Ok(years) => years,
            Err(e) => {
                log::error!("{e}");
                return None;
            }
        };
        Some(Selection {
            countries: self.selected.clone(),
            years,
        })
    }

    /// Recompute plotted rows, series and axis bounds after any change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let Some(selection) = self.selection() else {
            self.rows.clear();
            self.series.clear();
            self.y_bounds = None;
            return;
        };
        self.rows = filter_rows(ds, &selection, self.policy);
        self.series = build_series(&self.rows);
        self.y_bounds = y_axis_range(&self.rows, self.axis_padding, ds.value_range);
    }

    /// Toggle a single country in the selection.
    pub fn toggle_country(&mut self, country: &str) {
        if !self.selected.remove(country) {
            self.selected.insert(country.to_string());
        }
        self.refilter();
    }

    /// Select every country of the dataset.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected = ds.domain.countries.iter().cloned().collect();
            self.refilter();
        }
    }

    /// Deselect all countries.
    pub fn select_none(&mut self) {
        self.selected.clear();
        self.refilter();
    }

    /// Move the lower year bound, dragging the upper one along if needed.
    pub fn set_year_lo(&mut self, year: Year) {
        self.year_lo = year;
        self.year_hi = self.year_hi.max(year);
        self.refilter();
    }

    /// Move the upper year bound, dragging the lower one along if needed.
    pub fn set_year_hi(&mut self, year: Year) {
        self.year_hi = year;
        self.year_lo = self.year_lo.min(year);
        self.refilter();
    }

    /// Switch the missing-value policy.
    pub fn set_policy(&mut self, policy: FillPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.refilter();
        }
    }
}
