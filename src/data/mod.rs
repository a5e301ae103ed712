/// Data layer: core types, loading, filtering and chart preparation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet  (wide: one row per country)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → WideTable → GdpDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ GdpDataset │  Vec<LongRecord>, Domain (years, countries)
///   └────────────┘
///        │   Selection + FillPolicy
///        ▼
///   ┌──────────┐
///   │  filter   │  select rows → gap-fill → y-axis bounds
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  series   │  per-country line segments for the plot
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;
