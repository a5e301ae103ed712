use std::collections::HashSet;

use serde::Serialize;

use super::error::MalformedInputError;

/// Calendar year as found in the column labels of the source table.
pub type Year = i32;

// ---------------------------------------------------------------------------
// Wide format – one row per country, one column per year
// ---------------------------------------------------------------------------

/// One country row of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRecord {
    pub country: String,
    /// One value per year column, aligned with [`WideTable::years`].
    pub values: Vec<Option<f64>>,
}

/// The source table before reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    /// Year labels in column order.
    pub years: Vec<Year>,
    pub rows: Vec<WideRecord>,
}

impl WideTable {
    /// Start a table with the given year columns.
    pub fn new(years: Vec<Year>) -> Result<Self, MalformedInputError> {
        if years.is_empty() {
            return Err(MalformedInputError::NoYearColumns);
        }
        let mut seen = HashSet::with_capacity(years.len());
        for &year in &years {
            if !seen.insert(year) {
                return Err(MalformedInputError::DuplicateYear(year));
            }
        }
        Ok(WideTable {
            years,
            rows: Vec::new(),
        })
    }

    /// Append a country row. The row must carry one value per year column.
    pub fn push(&mut self, record: WideRecord) -> Result<(), MalformedInputError> {
        if record.values.len() != self.years.len() {
            return Err(MalformedInputError::RowWidth {
                country: record.country,
                expected: self.years.len(),
                found: record.values.len(),
            });
        }
        if record.country.is_empty() {
            return Err(MalformedInputError::EmptyCountry {
                row: self.rows.len(),
            });
        }
        self.rows.push(record);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Long format – one row per (country, year)
// ---------------------------------------------------------------------------

/// A single observation. `value` is `None` where the source cell was
/// empty or not a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRecord {
    pub country: String,
    pub year: Year,
    pub value: Option<f64>,
}

/// Year bounds and country list used to populate the input widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub min_year: Year,
    pub max_year: Year,
    /// Distinct countries in first-seen order.
    pub countries: Vec<String>,
}

// ---------------------------------------------------------------------------
// GdpDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The reshaped dataset. Immutable once built.
#[derive(Debug, Clone)]
pub struct GdpDataset {
    /// Observations in source row order × source column order.
    pub records: Vec<LongRecord>,
    pub domain: Domain,
    /// Smallest and largest present value over the whole table.
    pub value_range: Option<(f64, f64)>,
}

impl GdpDataset {
    /// Unpivot a wide table into long records and derive the domain.
    pub fn from_wide(table: WideTable) -> Result<Self, MalformedInputError> {
        if table.rows.is_empty() {
            return Err(MalformedInputError::NoCountries);
        }

        let mut seen: HashSet<&str> = HashSet::with_capacity(table.rows.len());
        for row in &table.rows {
            if !seen.insert(row.country.as_str()) {
                return Err(MalformedInputError::DuplicateCountry(row.country.clone()));
            }
        }

        // `WideTable::new` guarantees at least one year.
        let min_year = table.years.iter().copied().min().unwrap_or_default();
        let max_year = table.years.iter().copied().max().unwrap_or_default();
        let countries: Vec<String> = table.rows.iter().map(|r| r.country.clone()).collect();

        let mut records = Vec::with_capacity(table.rows.len() * table.years.len());
        let mut value_range: Option<(f64, f64)> = None;
        for row in table.rows {
            for (&year, value) in table.years.iter().zip(row.values) {
                if let Some(v) = value {
                    value_range = Some(match value_range {
                        Some((lo, hi)) => (lo.min(v), hi.max(v)),
                        None => (v, v),
                    });
                }
                records.push(LongRecord {
                    country: row.country.clone(),
                    year,
                    value,
                });
            }
        }

        Ok(GdpDataset {
            records,
            domain: Domain {
                min_year,
                max_year,
                countries,
            },
            value_range,
        })
    }

    /// Number of long records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, values: &[Option<f64>]) -> WideRecord {
        WideRecord {
            country: country.to_string(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn unpivot_covers_every_country_year_pair() {
        let mut table = WideTable::new(vec![2000, 2001, 2002]).unwrap();
        table.push(row("A", &[Some(10.0), None, Some(30.0)])).unwrap();
        table.push(row("B", &[Some(5.0), Some(7.0), Some(9.0)])).unwrap();

        let ds = GdpDataset::from_wide(table).unwrap();
        assert_eq!(ds.len(), 6);

        let pairs: HashSet<(String, Year)> = ds
            .records
            .iter()
            .map(|r| (r.country.clone(), r.year))
            .collect();
        assert_eq!(pairs.len(), 6);
        for c in ["A", "B"] {
            for y in 2000..=2002 {
                assert!(pairs.contains(&(c.to_string(), y)));
            }
        }

        // Row order × column order.
        let order: Vec<(&str, Year)> = ds
            .records
            .iter()
            .map(|r| (r.country.as_str(), r.year))
            .collect();
        assert_eq!(order[0], ("A", 2000));
        assert_eq!(order[2], ("A", 2002));
        assert_eq!(order[3], ("B", 2000));
        assert_eq!(ds.records[1].value, None);
    }

    #[test]
    fn domain_keeps_first_seen_country_order() {
        let mut table = WideTable::new(vec![1990, 1960, 2010]).unwrap();
        table.push(row("Zambia", &[None, None, None])).unwrap();
        table.push(row("Albania", &[Some(1.0), None, None])).unwrap();

        let ds = GdpDataset::from_wide(table).unwrap();
        assert_eq!(ds.domain.min_year, 1960);
        assert_eq!(ds.domain.max_year, 2010);
        assert_eq!(ds.domain.countries, vec!["Zambia", "Albania"]);
        assert_eq!(ds.value_range, Some((1.0, 1.0)));
    }

    #[test]
    fn duplicate_country_is_rejected() {
        let mut table = WideTable::new(vec![2000]).unwrap();
        table.push(row("A", &[Some(1.0)])).unwrap();
        table.push(row("A", &[Some(2.0)])).unwrap();
        assert_eq!(
            GdpDataset::from_wide(table).unwrap_err(),
            MalformedInputError::DuplicateCountry("A".into())
        );
    }

    #[test]
    fn table_shape_errors() {
        assert_eq!(
            WideTable::new(vec![]).unwrap_err(),
            MalformedInputError::NoYearColumns
        );
        assert_eq!(
            WideTable::new(vec![2000, 2000]).unwrap_err(),
            MalformedInputError::DuplicateYear(2000)
        );

        let mut table = WideTable::new(vec![2000, 2001]).unwrap();
        assert!(matches!(
            table.push(row("A", &[Some(1.0)])),
            Err(MalformedInputError::RowWidth { expected: 2, found: 1, .. })
        ));
        assert_eq!(
            table.push(row("", &[None, None])).unwrap_err(),
            MalformedInputError::EmptyCountry { row: 0 }
        );
        assert_eq!(
            GdpDataset::from_wide(table).unwrap_err(),
            MalformedInputError::NoCountries
        );
    }
}
