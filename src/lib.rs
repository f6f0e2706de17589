//! Video game sales explorer: load a sales dataset, clean it once, then
//! narrow it interactively with composable filters.
//!
//! The [`data`] layer is UI-independent; the `vgsales-explorer` binary is a
//! thin egui host on top of it.

pub mod args;
pub mod data;
pub mod error;

pub use args::Arguments;
pub use error::{DataError, DataResult};

/// Number of raw rows considered by default, counted before any cleaning.
pub const DEFAULT_ROW_LIMIT: usize = 5000;

/// Number of rows shown in the bounded preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 20;

/// Genre sentinel meaning "do not filter on genre".
pub const ALL_GENRES: &str = "All";
