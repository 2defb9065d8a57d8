//! Data layer: records, loading, and filtering.
//!
//! ```text
//!  .csv / .json
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ Dataset  │  Vec<WageRecord>, in file order
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter  │  wage <= threshold → new Dataset
//!   └──────────┘
//! ```
pub mod filter;
pub mod loader;
pub mod model;

pub use loader::{from_csv_reader, from_json_reader, load_file};
pub use model::{ColumnSummary, Dataset, Description, WageRecord};
