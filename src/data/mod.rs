/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → LaunchDataset (schema contract checked)
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaunchDataset  │  Vec<LaunchRecord>, immutable
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  site selector + payload range → matching indices
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
