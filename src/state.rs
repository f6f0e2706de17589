use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use vgsales::data::columns::{GENRE, PLATFORM};
use vgsales::data::filter::labels;
use vgsales::data::{filter, FilterCriteria, GenreFilter, PreprocessCache, Summary, Table};

/// Top-N value offered when the user first enables ranking.
const DEFAULT_TOP_N: usize = 10;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Preprocessed tables by (source, row limit).
    pub cache: PreprocessCache,

    /// Currently opened source file.
    pub source: Option<PathBuf>,

    /// Raw rows considered per load.
    pub row_limit: usize,

    /// Rows shown in the preview grid.
    pub preview_rows: usize,

    /// Cleaned dataset (None until user loads a file).
    pub table: Option<Arc<Table>>,

    /// Current filter selections.
    pub criteria: FilterCriteria,

    /// Rows passing the current filters (cached).
    pub filtered: Table,

    /// Headline metrics of `filtered`.
    pub summary: Summary,

    /// Choices for the selection widgets, from the loaded table.
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub year_bounds: Option<(i64, i64)>,

    /// Slider value behind `criteria.top_n`, kept while ranking is off.
    pub top_n_value: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(row_limit: usize, preview_rows: usize) -> Self {
        Self {
            cache: PreprocessCache::new(),
            source: None,
            row_limit,
            preview_rows,
            table: None,
            criteria: FilterCriteria::default(),
            filtered: Table::default(),
            summary: Summary::of(&Table::default()),
            genres: Vec::new(),
            platforms: Vec::new(),
            year_bounds: None,
            top_n_value: DEFAULT_TOP_N,
            status_message: None,
        }
    }

    /// Load (or fetch from cache) `path` and show it unfiltered.
    pub fn open(&mut self, path: PathBuf) {
        let loaded = self
            .cache
            .get_or_load(&path, self.row_limit)
            .with_context(|| format!("opening {}", path.display()));

        match loaded {
            Ok(table) => {
                log::info!(
                    "Loaded {} games from {} with columns {:?}",
                    table.len(),
                    path.display(),
                    table.schema().names()
                );
                self.source = Some(path);
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Drop the cached table of the current source and read it again.
    pub fn reload(&mut self) {
        if let Some(path) = self.source.clone() {
            self.cache.invalidate(&path);
            self.open(path);
        }
    }

    /// Ingest a newly loaded table, reset filters and widget choices.
    pub fn set_table(&mut self, table: Arc<Table>) {
        self.criteria = FilterCriteria::unfiltered(&table);
        self.genres = labels(&table, GENRE);
        self.platforms = labels(&table, PLATFORM);
        self.year_bounds = table.year_bounds();
        self.table = Some(table);
        self.status_message = None;
        self.refilter();
    }

    /// Replace the filter selections wholesale (e.g. from the command line).
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if let Some(k) = criteria.top_n {
            self.top_n_value = k.get();
        }
        self.criteria = criteria;
        self.refilter();
    }

    /// Recompute `filtered` and `summary` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.filtered = filter(table, &self.criteria);
            self.summary = Summary::of(&self.filtered);
        }
    }

    pub fn set_genre(&mut self, genre: GenreFilter) {
        self.criteria.genre = genre;
        self.refilter();
    }

    /// Toggle a single platform in the selection.
    pub fn toggle_platform(&mut self, platform: &str) {
        if !self.criteria.platforms.remove(platform) {
            self.criteria.platforms.insert(platform.to_string());
        }
        self.refilter();
    }

    /// Empty selection: every platform is shown.
    pub fn clear_platforms(&mut self) {
        self.criteria.platforms.clear();
        self.refilter();
    }

    pub fn set_year_range(&mut self, min: i64, max: i64) {
        self.criteria.year_range = (min, max);
        self.refilter();
    }

    /// Turn top-N ranking on (with the slider value) or off.
    pub fn set_top_n(&mut self, enabled: bool) {
        self.criteria.top_n = if enabled {
            NonZeroUsize::new(self.top_n_value)
        } else {
            None
        };
        self.refilter();
    }
}
