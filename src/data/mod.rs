/// Data layer: core types, spreadsheet loading, and fit inputs.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  sheet names, parse sheet → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  ordered column name → values
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  fitting  │  x / y column choice, fitting function catalogue
///   └──────────┘
/// ```

pub mod fitting;
pub mod loader;
pub mod model;
