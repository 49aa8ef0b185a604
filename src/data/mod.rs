/// Data layer: core types, parsing, and the series transformer.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows → Vec<Observation>  (bad rows skipped + counted)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ transform │  raw | moving average  → Series
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ annotate  │  EventRange → start/end lines + label
///   └──────────┘
/// ```

pub mod annotate;
pub mod loader;
pub mod model;
pub mod transform;
