/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .parquet / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawRecord → validated AirQualityDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────────┐
///   │ AirQualityDataset  │  Vec<Observation>, year bounds (immutable)
///   └───────────────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  pivot / trend / yearly means / correlation
///   └───────────┘
/// ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
