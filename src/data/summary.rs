use serde::Serialize;

use super::columns::{GENRE, GLOBAL_SALES, PLATFORM};
use super::filter::labels;
use super::model::Table;

/// Headline metrics shown above the filtered rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    pub distinct_platforms: usize,
    pub distinct_genres: usize,
    /// Millions of units, rounded to two decimals.
    pub total_global_sales: f64,
}

impl Summary {
    pub fn of(table: &Table) -> Self {
        Self {
            games: table.len(),
            distinct_platforms: labels(table, PLATFORM).len(),
            distinct_genres: labels(table, GENRE).len(),
            total_global_sales: (table.sum(GLOBAL_SALES) * 100.0).round() / 100.0,
        }
    }
}
