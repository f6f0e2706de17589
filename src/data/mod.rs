//! Data layer: core types, loading, cleaning and filtering.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → RawTable
//!   └──────────┘
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ preprocess  │  truncate, repair, derive, clamp → Table   (memoized by cache)
//!   └────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  genre / platform / year predicates, top-N → Table
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ summary   │  headline metrics for the host
//!   └──────────┘
//! ```

pub mod cache;
pub mod columns;
pub mod filter;
pub mod loader;
pub mod model;
pub mod preprocess;
pub mod summary;

pub use cache::PreprocessCache;
pub use filter::{filter, FilterCriteria, GenreFilter};
pub use model::{RawTable, Record, Schema, Table, Value};
pub use preprocess::{preprocess, preprocess_file};
pub use summary::Summary;
