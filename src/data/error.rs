use thiserror::Error;

use super::model::Year;

/// The input file cannot be reshaped into one row per country with one
/// numeric column per year.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    #[error("missing '{0}' key column")]
    MissingKeyColumn(&'static str),

    #[error("column label '{0}' is not an integer year")]
    NonIntegerYear(String),

    #[error("year column {0} appears more than once")]
    DuplicateYear(Year),

    #[error("country '{0}' appears more than once")]
    DuplicateCountry(String),

    #[error("row {row} has an empty country key")]
    EmptyCountry { row: usize },

    #[error("row for '{country}' has {found} values but the header has {expected} years")]
    RowWidth {
        country: String,
        expected: usize,
        found: usize,
    },

    #[error("no year columns found")]
    NoYearColumns,

    #[error("no country rows found")]
    NoCountries,
}

/// A year range whose lower bound lies above its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid year range: {lo} is after {hi}")]
pub struct InvalidSelectionError {
    pub lo: Year,
    pub hi: Year,
}
