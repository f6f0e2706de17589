use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

use crate::data::{FilterCriteria, GenreFilter, Table};
use crate::{ALL_GENRES, DEFAULT_PREVIEW_ROWS, DEFAULT_ROW_LIMIT};

const EXAMPLES: &str = "\
EXAMPLES:
 vgsales-explorer vgsales.csv
 vgsales-explorer vgsales.csv --rows 16000
 vgsales-explorer vgsales.csv --summary --genre Sports --platform Wii --years 2000:2010 --top 10";

/// Inclusive `MIN:MAX` year range given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange(pub i64, pub i64);

fn parse_year_range(s: &str) -> Result<YearRange, String> {
    let (min, max) = s
        .split_once(':')
        .ok_or_else(|| format!("expected MIN:MAX, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<i64>()
            .map_err(|e| format!("invalid year '{v}': {e}"))
    };
    Ok(YearRange(parse(min)?, parse(max)?))
}

/// Command-line arguments for the explorer.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Arguments {
    /// Sales file to open on start (.csv, .json, .parquet).
    pub path: Option<PathBuf>,

    /// Number of raw rows to read, counted before cleaning.
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_ROW_LIMIT as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rows: u64,

    /// Rows shown in the preview.
    #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub preview: usize,

    /// Print the summary of the filtered rows to stdout instead of opening a window.
    #[arg(short, long, requires = "path")]
    pub summary: bool,

    /// Genre to keep [default: all genres].
    #[arg(short, long, default_value = ALL_GENRES)]
    pub genre: String,

    /// Platform to keep, repeatable [default: all platforms].
    #[arg(short = 'P', long = "platform", value_name = "PLATFORM")]
    pub platforms: Vec<String>,

    /// Inclusive year range [default: the whole dataset].
    #[arg(short, long, value_name = "MIN:MAX", value_parser = parse_year_range)]
    pub years: Option<YearRange>,

    /// Keep only the K best sellers by global sales.
    #[arg(short, long, value_name = "K")]
    pub top: Option<NonZeroUsize>,
}

impl Arguments {
    pub fn build() -> Self {
        Self::parse()
    }

    pub fn row_limit(&self) -> usize {
        usize::try_from(self.rows).unwrap_or(usize::MAX)
    }

    /// Filter criteria from the command line, with missing years taken
    /// from the table itself.
    pub fn criteria(&self, table: &Table) -> FilterCriteria {
        let base = FilterCriteria::unfiltered(table);
        FilterCriteria {
            genre: GenreFilter::from(self.genre.as_str()),
            platforms: self.platforms.iter().cloned().collect(),
            year_range: self
                .years
                .map_or(base.year_range, |YearRange(min, max)| (min, max)),
            top_n: self.top,
        }
    }
}
