use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::columns;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common dataframe dtypes.
/// Using `BTreeMap` / `BTreeSet` downstream so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Numeric view of the cell, `None` for text, booleans and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Re-type a label cell as text without losing digits
    /// (`Integer(2600)` becomes `"2600"`). Nulls stay null.
    pub fn into_text(self) -> Value {
        match self {
            Value::Integer(i) => Value::Text(i.to_string()),
            Value::Float(v) => Value::Text(v.to_string()),
            Value::Bool(b) => Value::Text(b.to_string()),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – which columns exist, and where
// ---------------------------------------------------------------------------

/// Ordered column names. Columns are present or absent for the whole table,
/// never per row, so every pipeline step asks the schema first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    names: Vec<String>,
    positions: BTreeMap<String, usize>,
}

impl Schema {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schema = Schema::default();
        for name in names {
            let name = name.into();
            // A repeated header keeps its first position for lookups.
            schema
                .positions
                .entry(name.clone())
                .or_insert(schema.names.len());
            schema.names.push(name);
        }
        schema
    }

    /// Schema capability test: is `column` present?
    pub fn has(&self, column: &str) -> bool {
        self.positions.contains_key(column)
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `column`, appending it at the end if it is new.
    pub fn ensure(&mut self, column: &str) -> usize {
        if let Some(pos) = self.position(column) {
            return pos;
        }
        let pos = self.names.len();
        self.names.push(column.to_string());
        self.positions.insert(column.to_string(), pos);
        pos
    }
}

// ---------------------------------------------------------------------------
// RawTable – what a loader hands to the preprocessor
// ---------------------------------------------------------------------------

/// An unvalidated record set straight from a source file.
/// Every row holds exactly `schema.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub schema: Schema,
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        let width = schema.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        RawTable { schema, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record / Table – the normalized dataset
// ---------------------------------------------------------------------------

/// One game's sales entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Row label assigned by preprocessing (`0..n-1`), kept through filtering.
    pub index: usize,
    /// One cell per schema column.
    pub cells: Vec<Value>,
}

/// An ordered, immutable collection of records sharing one schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    schema: Schema,
    records: Vec<Record>,
}

impl Table {
    pub fn new(schema: Schema, records: Vec<Record>) -> Self {
        Table { schema, records }
    }

    /// A table with the same schema holding `records`.
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Table {
        Table {
            schema: self.schema.clone(),
            records,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Row count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.schema.has(column)
    }

    /// Cell at position `row` (not row label) of `column`.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let pos = self.schema.position(column)?;
        self.records.get(row).and_then(|r| r.cells.get(pos))
    }

    /// All cells of `column` in row order; empty when the column is absent.
    pub fn column<'a>(&'a self, column: &str) -> impl Iterator<Item = &'a Value> + 'a {
        self.schema
            .position(column)
            .into_iter()
            .flat_map(move |pos| self.records.iter().filter_map(move |r| r.cells.get(pos)))
    }

    /// Sorted distinct values of a (categorical) column.
    pub fn distinct(&self, column: &str) -> BTreeSet<Value> {
        self.column(column).cloned().collect()
    }

    /// Sum of the numeric cells of `column`; `0.0` for an absent column or
    /// an empty table.
    pub fn sum(&self, column: &str) -> f64 {
        self.column(column).filter_map(Value::as_f64).sum()
    }

    /// Bounded preview: the first `rows` records in current order.
    pub fn head(&self, rows: usize) -> Table {
        self.with_records(self.records.iter().take(rows).cloned().collect())
    }

    /// Smallest and largest `Year`, if the column exists and has values.
    pub fn year_bounds(&self) -> Option<(i64, i64)> {
        self.column(columns::YEAR)
            .filter_map(Value::as_i64)
            .fold(None, |bounds, year| match bounds {
                None => Some((year, year)),
                Some((lo, hi)) => Some((lo.min(year), hi.max(year))),
            })
    }
}
