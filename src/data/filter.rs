use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use super::columns::{GENRE, GLOBAL_SALES, PLATFORM, YEAR};
use super::model::{Record, Table, Value};
use crate::ALL_GENRES;

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Genre selection. `All` switches the genre predicate off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenreFilter {
    #[default]
    All,
    Only(String),
}

impl From<&str> for GenreFilter {
    fn from(genre: &str) -> Self {
        if genre == ALL_GENRES {
            GenreFilter::All
        } else {
            GenreFilter::Only(genre.to_string())
        }
    }
}

impl GenreFilter {
    pub fn label(&self) -> &str {
        match self {
            GenreFilter::All => ALL_GENRES,
            GenreFilter::Only(genre) => genre,
        }
    }
}

/// Everything the user can narrow the table by.
///
/// * `platforms` empty → no platform constraint (not "nothing matches")
/// * `year_range` is inclusive on both ends
/// * `top_n` keeps the K best sellers by `Global_Sales`, applied last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub genre: GenreFilter,
    pub platforms: BTreeSet<String>,
    pub year_range: (i64, i64),
    pub top_n: Option<NonZeroUsize>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            genre: GenreFilter::All,
            platforms: BTreeSet::new(),
            year_range: (i64::MIN, i64::MAX),
            top_n: None,
        }
    }
}

impl FilterCriteria {
    /// Criteria that keep every row of `table`.
    pub fn unfiltered(table: &Table) -> Self {
        Self {
            year_range: table.year_bounds().unwrap_or((i64::MIN, i64::MAX)),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the rows of `table` that pass every active predicate.
///
/// Genre, platform and year predicates are independent and each one is
/// skipped when its column is missing. Top-N ranking then sorts the
/// survivors by `Global_Sales` (descending, ties keep their order) and
/// truncates. An empty result is a normal outcome.
pub fn filter(table: &Table, criteria: &FilterCriteria) -> Table {
    let schema = table.schema();

    let genre = match &criteria.genre {
        GenreFilter::All => None,
        GenreFilter::Only(genre) => schema.position(GENRE).map(|pos| (pos, genre.as_str())),
    };
    let platforms = if criteria.platforms.is_empty() {
        None
    } else {
        schema.position(PLATFORM)
    };
    let year = schema.position(YEAR);
    let (min_year, max_year) = criteria.year_range;

    let mut kept: Vec<Record> = table
        .records()
        .iter()
        .filter(|r| genre.map_or(true, |(pos, genre)| r.cells[pos].as_str() == Some(genre)))
        .filter(|r| {
            platforms.map_or(true, |pos| {
                r.cells[pos]
                    .as_str()
                    .is_some_and(|p| criteria.platforms.contains(p))
            })
        })
        .filter(|r| {
            year.map_or(true, |pos| {
                r.cells[pos]
                    .as_i64()
                    .is_some_and(|y| min_year <= y && y <= max_year)
            })
        })
        .cloned()
        .collect();

    if let (Some(k), Some(pos)) = (criteria.top_n, schema.position(GLOBAL_SALES)) {
        let sales = |r: &Record| r.cells[pos].as_f64().unwrap_or(f64::NEG_INFINITY);
        // `sort_by` is stable: equal sales keep their filtered order.
        kept.sort_by(|a, b| sales(b).total_cmp(&sales(a)));
        kept.truncate(k.get());
    }

    log::debug!("Filter {criteria:?} kept {} of {} rows", kept.len(), table.len());
    table.with_records(kept)
}

/// Distinct text labels of a categorical column, for selection widgets.
pub fn labels(table: &Table, column: &str) -> Vec<String> {
    table
        .distinct(column)
        .into_iter()
        .filter_map(|v| match v {
            Value::Text(s) => Some(s),
            _ => None,
        })
        .collect()
}
