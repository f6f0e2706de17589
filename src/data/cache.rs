use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::model::Table;
use super::preprocess::preprocess_file;
use crate::error::DataResult;

/// Memoizes [`preprocess_file`] by `(source path, row_limit)`.
///
/// Preprocessing is a pure function of its inputs, so a hit returns exactly
/// what a fresh run would. Tables are shared read-only behind `Arc`.
#[derive(Debug, Default)]
pub struct PreprocessCache {
    tables: HashMap<(PathBuf, usize), Arc<Table>>,
}

impl PreprocessCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table for `(path, row_limit)`, loading it on first use.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, path: &Path, row_limit: usize) -> DataResult<Arc<Table>> {
        let key = (path.to_path_buf(), row_limit);
        if let Some(table) = self.tables.get(&key) {
            log::debug!("Cache hit for {} (row limit {row_limit})", path.display());
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(preprocess_file(path, row_limit)?);
        self.tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Forget every cached table built from `path`, whatever its row limit.
    pub fn invalidate(&mut self, path: &Path) {
        self.tables.retain(|(cached, _), _| cached != path);
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;

    fn write_csv(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("vgsales.csv");
        std::fs::write(&path, format!("Name,Year,Global_Sales\n{body}")).unwrap();
        path
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "Pong,1972,1.0\nTetris,1989,30.26\n");
        let mut cache = PreprocessCache::new();

        let first = cache.get_or_load(&path, 10).unwrap();
        // Changing the file does not matter until the entry is invalidated.
        std::fs::write(&path, "Name,Year\n").unwrap();
        let second = cache.get_or_load(&path, 10).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);

        cache.invalidate(&path);
        assert!(cache.is_empty());
        assert!(cache.get_or_load(&path, 10).unwrap().is_empty());
    }

    #[test]
    fn row_limit_is_part_of_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "Pong,1972,1.0\nTetris,1989,30.26\n");
        let mut cache = PreprocessCache::new();

        assert_eq!(cache.get_or_load(&path, 1).unwrap().len(), 1);
        assert_eq!(cache.get_or_load(&path, 5000).unwrap().len(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let mut cache = PreprocessCache::new();

        assert!(matches!(cache.get_or_load(&path, 10), Err(DataError::Io(_))));
        assert!(cache.is_empty());
    }
}
