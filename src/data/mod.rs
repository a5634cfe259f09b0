/// Data layer: core types, loading, and the filter-aggregate engine.
///
/// Architecture:
/// ```text
///  .xlsx / .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → SalesTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ SalesTable  │  Vec<SalesRecord>, column index
///   └────────────┘
///        │            FilterSelection
///        ▼                  │
///   ┌──────────┐◄───────────┘
///   │  engine   │  filter rows, group by dimension,
///   └──────────┘  mean the metric → AggregatedSeries
/// ```
pub mod engine;
pub mod loader;
pub mod model;
