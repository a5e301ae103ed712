use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use super::error::InvalidSelectionError;
use super::model::{Domain, GdpDataset, LongRecord, Year};

// ---------------------------------------------------------------------------
// Selection: which countries and years the user asked for
// ---------------------------------------------------------------------------

/// Inclusive year bounds with `lo <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    lo: Year,
    hi: Year,
}

impl YearRange {
    pub fn new(lo: Year, hi: Year) -> Result<Self, InvalidSelectionError> {
        if lo > hi {
            return Err(InvalidSelectionError { lo, hi });
        }
        Ok(YearRange { lo, hi })
    }

    /// The whole year span of a dataset.
    pub fn full(domain: &Domain) -> Self {
        YearRange {
            lo: domain.min_year,
            hi: domain.max_year,
        }
    }

    pub fn lo(&self) -> Year {
        self.lo
    }

    pub fn hi(&self) -> Year {
        self.hi
    }

    pub fn contains(&self, year: Year) -> bool {
        self.lo <= year && year <= self.hi
    }
}

/// Country input as it arrives from outside: a single name or a list.
///
/// Normalize with [`CountryInput::into_set`] before it reaches the filter.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CountryInput {
    One(String),
    Many(Vec<String>),
}

impl CountryInput {
    pub fn into_set(self) -> BTreeSet<String> {
        match self {
            CountryInput::One(country) => BTreeSet::from([country]),
            CountryInput::Many(countries) => countries.into_iter().collect(),
        }
    }
}

/// One interaction's worth of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub years: YearRange,
}

// ---------------------------------------------------------------------------
// Missing-value policy
// ---------------------------------------------------------------------------

/// How missing observations are treated before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Keep selected rows as they are; gaps stay missing and rows keep
    /// source order.
    Strict,
    /// Fill gaps with the country's mean over the selected years, drop what
    /// cannot be filled, sort by year.
    #[default]
    GapFill,
}

impl FillPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            FillPolicy::Strict => "Strict",
            FillPolicy::GapFill => "Gap-fill",
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows to plot for the given selection.
pub fn filter_rows(
    dataset: &GdpDataset,
    selection: &Selection,
    policy: FillPolicy,
) -> Vec<LongRecord> {
    let rows = select_rows(&dataset.records, selection);
    let rows = match policy {
        FillPolicy::Strict => rows,
        FillPolicy::GapFill => gap_fill(rows),
    };
    log::debug!(
        "{} countries over {}..={} ({policy:?}) -> {} rows",
        selection.countries.len(),
        selection.years.lo(),
        selection.years.hi(),
        rows.len()
    );
    rows
}

/// Rows whose country is selected and whose year lies in range, in source
/// order.
pub fn select_rows(records: &[LongRecord], selection: &Selection) -> Vec<LongRecord> {
    if selection.countries.is_empty() {
        return Vec::new();
    }
    records
        .iter()
        .filter(|r| selection.years.contains(r.year) && selection.countries.contains(&r.country))
        .cloned()
        .collect()
}

/// Replace each missing value with its country's mean over `rows`, drop
/// rows that stay missing, then stable-sort by year.
pub fn gap_fill(rows: Vec<LongRecord>) -> Vec<LongRecord> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for r in &rows {
        if let Some(v) = r.value {
            let entry = sums.entry(r.country.as_str()).or_default();
            entry.0 += v;
            entry.1 += 1;
        }
    }
    let means: HashMap<String, f64> = sums
        .into_iter()
        .map(|(country, (sum, n))| (country.to_string(), sum / n as f64))
        .collect();

    let mut filled: Vec<LongRecord> = rows
        .into_iter()
        .filter_map(|mut r| {
            if r.value.is_none() {
                r.value = means.get(&r.country).copied();
            }
            r.value.is_some().then_some(r)
        })
        .collect();
    filled.sort_by_key(|r| r.year);
    filled
}

// ---------------------------------------------------------------------------
// Y-axis bounds
// ---------------------------------------------------------------------------

/// Y-axis bounds for `rows`: the value range widened by `padding` times its
/// span on each side.
///
/// Returns `None` when no row carries a value; the chart then picks its own
/// bounds. A zero-width range is widened by `padding` times the span of
/// `global` (the whole dataset) instead, then by `padding * |value|`, and
/// finally by `1.0`.
pub fn y_axis_range(
    rows: &[LongRecord],
    padding: f64,
    global: Option<(f64, f64)>,
) -> Option<(f64, f64)> {
    let (lo, hi) = rows
        .iter()
        .filter_map(|r| r.value)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;

    let span = hi - lo;
    let buffer = if span > 0.0 {
        span * padding
    } else {
        global
            .map(|(g_lo, g_hi)| (g_hi - g_lo) * padding)
            .filter(|b| *b > 0.0)
            .or_else(|| Some(lo.abs() * padding).filter(|b| *b > 0.0))
            .unwrap_or(1.0)
    };
    Some((lo - buffer, hi + buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{WideRecord, WideTable};

    /// A = {2000: 10, 2001: –, 2002: 30}, B = {2000: 5, 2001: 7, 2002: 9}
    fn sample() -> GdpDataset {
        let mut table = WideTable::new(vec![2000, 2001, 2002]).unwrap();
        table
            .push(WideRecord {
                country: "A".into(),
                values: vec![Some(10.0), None, Some(30.0)],
            })
            .unwrap();
        table
            .push(WideRecord {
                country: "B".into(),
                values: vec![Some(5.0), Some(7.0), Some(9.0)],
            })
            .unwrap();
        GdpDataset::from_wide(table).unwrap()
    }

    fn selection(countries: CountryInput, lo: Year, hi: Year) -> Selection {
        Selection {
            countries: countries.into_set(),
            years: YearRange::new(lo, hi).unwrap(),
        }
    }

    fn both() -> CountryInput {
        CountryInput::Many(vec!["A".into(), "B".into()])
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn strict_keeps_gaps_and_source_order() {
        let ds = sample();
        let rows = filter_rows(&ds, &selection(both(), 2000, 2002), FillPolicy::Strict);

        assert_eq!(rows.len(), 6);
        assert_eq!(rows, ds.records);
        let gap = rows
            .iter()
            .find(|r| r.country == "A" && r.year == 2001)
            .unwrap();
        assert_eq!(gap.value, None);
    }

    #[test]
    fn gap_fill_uses_country_mean_and_sorts_by_year() {
        let ds = sample();
        let rows = filter_rows(&ds, &selection(both(), 2000, 2002), FillPolicy::GapFill);

        assert_eq!(rows.len(), 6);
        let years: Vec<Year> = rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2000, 2001, 2001, 2002, 2002]);

        // Stable sort keeps A before B within each year.
        let countries: Vec<&str> = rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["A", "B", "A", "B", "A", "B"]);
        assert_eq!(rows[2].value, Some(20.0));
    }

    #[test]
    fn gap_fill_mean_only_sees_the_selected_years() {
        let ds = sample();
        let rows = filter_rows(
            &ds,
            &selection(CountryInput::One("A".into()), 2001, 2002),
            FillPolicy::GapFill,
        );
        let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![Some(30.0), Some(30.0)]);
    }

    #[test]
    fn gap_fill_drops_country_without_values_in_window() {
        let ds = sample();
        let rows = filter_rows(&ds, &selection(both(), 2001, 2001), FillPolicy::GapFill);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].country, "B");
        assert!(rows.iter().all(|r| r.country != "A"));
    }

    #[test]
    fn gap_fill_without_missing_values_only_sorts() {
        let rows = vec![
            LongRecord { country: "B".into(), year: 2001, value: Some(2.0) },
            LongRecord { country: "A".into(), year: 2000, value: Some(1.0) },
            LongRecord { country: "B".into(), year: 2000, value: Some(3.0) },
        ];
        let mut expected = rows.clone();
        expected.sort_by_key(|r| r.year);

        assert_eq!(gap_fill(rows), expected);
    }

    #[test]
    fn every_row_satisfies_the_selection() {
        let ds = sample();
        let sel = selection(CountryInput::One("B".into()), 2001, 2002);
        for policy in [FillPolicy::Strict, FillPolicy::GapFill] {
            let rows = filter_rows(&ds, &sel, policy);
            assert_eq!(rows.len(), 2);
            for r in &rows {
                assert!(sel.countries.contains(&r.country));
                assert!(sel.years.contains(r.year));
            }
        }
    }

    #[test]
    fn empty_or_unknown_selection_yields_nothing() {
        let ds = sample();
        let cases = [
            selection(CountryInput::Many(vec![]), 2000, 2002),
            selection(CountryInput::One("Z".into()), 2000, 2002),
            selection(both(), 1900, 1950),
        ];
        for sel in &cases {
            for policy in [FillPolicy::Strict, FillPolicy::GapFill] {
                assert!(filter_rows(&ds, sel, policy).is_empty());
            }
        }
    }

    #[test]
    fn scalar_country_input_is_a_one_element_selection() {
        let ds = sample();
        let input: CountryInput = serde_json::from_str(r#""A""#).unwrap();
        assert_eq!(input, CountryInput::One("A".into()));

        let rows = filter_rows(&ds, &selection(input, 2000, 2000), FillPolicy::GapFill);
        assert_eq!(
            rows,
            vec![LongRecord { country: "A".into(), year: 2000, value: Some(10.0) }]
        );

        let list: CountryInput = serde_json::from_str(r#"["A", "B", "A"]"#).unwrap();
        assert_eq!(list.into_set().len(), 2);
    }

    #[test]
    fn inverted_year_range_is_rejected() {
        assert_eq!(
            YearRange::new(2002, 2000),
            Err(InvalidSelectionError { lo: 2002, hi: 2000 })
        );
        assert!(YearRange::new(2000, 2000).is_ok());
    }

    #[test]
    fn axis_range_pads_ten_percent_each_side() {
        let rows = vec![
            LongRecord { country: "A".into(), year: 2000, value: Some(10.0) },
            LongRecord { country: "A".into(), year: 2001, value: None },
            LongRecord { country: "A".into(), year: 2002, value: Some(30.0) },
        ];
        let (lo, hi) = y_axis_range(&rows, 0.1, None).unwrap();
        assert_close(lo, 8.0);
        assert_close(hi, 32.0);
    }

    #[test]
    fn axis_range_is_none_without_values() {
        assert_eq!(y_axis_range(&[], 0.1, Some((0.0, 1.0))), None);
        let gaps = vec![LongRecord { country: "A".into(), year: 2000, value: None }];
        assert_eq!(y_axis_range(&gaps, 0.1, Some((0.0, 1.0))), None);
    }

    #[test]
    fn zero_width_axis_range_falls_back() {
        let rows = vec![LongRecord { country: "A".into(), year: 2000, value: Some(50.0) }];

        let (lo, hi) = y_axis_range(&rows, 0.1, Some((0.0, 200.0))).unwrap();
        assert_close(lo, 30.0);
        assert_close(hi, 70.0);

        let (lo, hi) = y_axis_range(&rows, 0.1, Some((50.0, 50.0))).unwrap();
        assert_close(lo, 45.0);
        assert_close(hi, 55.0);

        let zero = vec![LongRecord { country: "A".into(), year: 2000, value: Some(0.0) }];
        assert_eq!(y_axis_range(&zero, 0.1, None), Some((-1.0, 1.0)));
    }
}
