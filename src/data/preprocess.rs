use std::path::Path;

use super::columns::{
    CATEGORICAL, DECADE, PUBLISHER, REGIONAL_SALES, SALES, SALES_LIKE, TOTAL_REGIONAL_SALES, YEAR,
};
use super::loader;
use super::model::{RawTable, Record, Schema, Table, Value};
use crate::error::DataResult;

/// Publisher written into rows that have none.
pub const UNKNOWN_PUBLISHER: &str = "Unknown";

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load `path` and run it through [`preprocess`].
pub fn preprocess_file(path: &Path, row_limit: usize) -> DataResult<Table> {
    let raw = loader::load_file(path)?;
    Ok(preprocess(&raw, row_limit))
}

/// Turn a raw record set into a normalized [`Table`].
///
/// Steps run in a fixed order, each skipped when its columns are missing:
///
/// 1. keep the first `row_limit` raw rows (before anything is dropped)
/// 2. fill a missing `Publisher` with `"Unknown"`
/// 3. drop rows without a `Year`, make `Year` an integer, derive `Decade`
/// 4. coerce sales columns to numbers, unreadable cells become `0.0`
/// 5. derive `Total_Regional_Sales` when all four regions exist
/// 6. clamp negative sales (including the derived total) to `0.0`
/// 7. number the surviving rows `0..n-1`
///
/// Label columns are re-typed as text up front. Cell problems never fail the
/// pipeline; `raw` is left untouched.
pub fn preprocess(raw: &RawTable, row_limit: usize) -> Table {
    let mut schema = raw.schema.clone();
    let mut rows: Vec<Vec<Value>> = raw.rows.iter().take(row_limit).cloned().collect();
    let considered = rows.len();

    normalize_labels(&schema, &mut rows);
    repair_publisher(&schema, &mut rows);
    enforce_year(&mut schema, &mut rows);
    normalize_sales(&schema, &mut rows);
    derive_total_regional_sales(&mut schema, &mut rows);
    clamp_negative_sales(&schema, &mut rows);
    let records = reindex(rows);

    log::info!(
        "Preprocessed {considered} of {} raw rows into {} rows with columns {:?}",
        raw.len(),
        records.len(),
        schema.names()
    );
    Table::new(schema, records)
}

// ---------------------------------------------------------------------------
// Pipeline steps
// ---------------------------------------------------------------------------

fn normalize_labels(schema: &Schema, rows: &mut [Vec<Value>]) {
    for pos in CATEGORICAL.iter().filter_map(|col| schema.position(col)) {
        for row in rows.iter_mut() {
            let cell = std::mem::replace(&mut row[pos], Value::Null);
            row[pos] = cell.into_text();
        }
    }
}

fn repair_publisher(schema: &Schema, rows: &mut [Vec<Value>]) {
    let Some(pos) = schema.position(PUBLISHER) else {
        return;
    };
    let mut filled = 0;
    for row in rows.iter_mut().filter(|row| row[pos].is_null()) {
        row[pos] = Value::from(UNKNOWN_PUBLISHER);
        filled += 1;
    }
    log::debug!("Filled {filled} missing publishers");
}

fn enforce_year(schema: &mut Schema, rows: &mut Vec<Vec<Value>>) {
    let Some(pos) = schema.position(YEAR) else {
        return;
    };
    let decade_pos = schema.ensure(DECADE);
    let width = schema.len();

    let before = rows.len();
    rows.retain_mut(|row| match coerce_year(&row[pos]) {
        Some(year) => {
            row.resize(width, Value::Null);
            row[pos] = Value::Integer(year);
            row[decade_pos] = Value::Integer(decade(year));
            true
        }
        None => false,
    });
    log::debug!("Dropped {} rows without a year", before - rows.len());
}

fn normalize_sales(schema: &Schema, rows: &mut [Vec<Value>]) {
    for col in SALES {
        let Some(pos) = schema.position(col) else {
            continue;
        };
        let mut defaulted = 0;
        for row in rows.iter_mut() {
            let number = coerce_sales(&row[pos]).unwrap_or_else(|| {
                defaulted += 1;
                0.0
            });
            row[pos] = Value::Float(number);
        }
        if defaulted > 0 {
            log::debug!("{col}: {defaulted} unreadable values set to 0.0");
        }
    }
}

fn derive_total_regional_sales(schema: &mut Schema, rows: &mut [Vec<Value>]) {
    let regional: Option<Vec<usize>> = REGIONAL_SALES
        .iter()
        .map(|col| schema.position(col))
        .collect();
    let Some(regional) = regional else {
        return;
    };
    let total_pos = schema.ensure(TOTAL_REGIONAL_SALES);
    let width = schema.len();

    for row in rows.iter_mut() {
        let total: f64 = regional
            .iter()
            .filter_map(|&pos| row[pos].as_f64())
            .sum();
        row.resize(width, Value::Null);
        row[total_pos] = Value::Float(total);
    }
}

// Runs after the total is derived, so a negative regional value still
// lowers the total before being clamped itself.
fn clamp_negative_sales(schema: &Schema, rows: &mut [Vec<Value>]) {
    for col in SALES_LIKE {
        let Some(pos) = schema.position(col) else {
            continue;
        };
        let mut clamped = 0;
        for row in rows.iter_mut() {
            // Sign check so `-0.0` is normalized as well.
            if matches!(row[pos], Value::Float(v) if v.is_sign_negative()) {
                row[pos] = Value::Float(0.0);
                clamped += 1;
            }
        }
        if clamped > 0 {
            log::debug!("{col}: clamped {clamped} negative values to 0.0");
        }
    }
}

fn reindex(rows: Vec<Vec<Value>>) -> Vec<Record> {
    rows.into_iter()
        .enumerate()
        .map(|(index, cells)| Record { index, cells })
        .collect()
}

// ---------------------------------------------------------------------------
// Cell coercion
// ---------------------------------------------------------------------------

/// Whole release year, or `None` when the cell cannot be read as one.
/// Years outside the `i32` range are unreadable too, which keeps
/// `Decade` from overflowing.
fn coerce_year(value: &Value) -> Option<i64> {
    let year = match value {
        Value::Integer(i) => return i32::try_from(*i).ok().map(i64::from),
        Value::Float(v) => *v,
        Value::Text(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return i32::try_from(i).ok().map(i64::from);
            }
            s.parse::<f64>().ok()?
        }
        Value::Bool(_) | Value::Null => return None,
    };
    if !year.is_finite() {
        return None;
    }
    i32::try_from(year.trunc() as i64).ok().map(i64::from)
}

fn decade(year: i64) -> i64 {
    year.div_euclid(10) * 10
}

/// Finite sales figure, or `None` when the cell is missing or unreadable.
fn coerce_sales(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Float(v) => *v,
        Value::Integer(i) => *i as f64,
        Value::Text(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(_) | Value::Null => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::columns::{GLOBAL_SALES, NAME, PLATFORM};
    use crate::data::loader::read_csv;

    const FULL_HEADER: &str =
        "Name,Platform,Year,Genre,Publisher,NA_Sales,EU_Sales,JP_Sales,Other_Sales,Global_Sales";

    fn csv(body: &str) -> RawTable {
        read_csv(format!("{FULL_HEADER}\n{body}").as_bytes()).unwrap()
    }

    fn float(table: &Table, row: usize, column: &str) -> f64 {
        table.value(row, column).and_then(Value::as_f64).unwrap()
    }

    fn int(table: &Table, row: usize, column: &str) -> i64 {
        table.value(row, column).and_then(Value::as_i64).unwrap()
    }

    #[test]
    fn end_to_end_example() {
        let raw = RawTable::new(
            Schema::new([YEAR, GLOBAL_SALES]),
            vec![
                vec![Value::Integer(1998), Value::from("1.5")],
                vec![Value::Null, Value::Float(2.0)],
                vec![Value::Integer(2005), Value::Float(-3.0)],
            ],
        );
        let table = preprocess(&raw, 10);

        assert_eq!(table.len(), 2);
        assert_eq!(table.schema().names(), [YEAR, GLOBAL_SALES, DECADE]);
        assert_eq!(int(&table, 0, DECADE), 1990);
        assert_eq!(float(&table, 0, GLOBAL_SALES), 1.5);
        assert_eq!(int(&table, 1, YEAR), 2005);
        assert_eq!(int(&table, 1, DECADE), 2000);
        assert_eq!(float(&table, 1, GLOBAL_SALES), 0.0);
        assert!(!table.has_column(TOTAL_REGIONAL_SALES));
    }

    #[test]
    fn truncation_happens_before_dropping_rows() {
        // 5 considered rows, 2 of them without a year; the 2 rows past the
        // limit have valid years and must not backfill.
        let raw = csv(
            "A,Wii,2006,Sports,Nintendo,1,1,1,1,4\n\
             B,Wii,,Sports,Nintendo,1,1,1,1,4\n\
             C,Wii,2007,Sports,Nintendo,1,1,1,1,4\n\
             D,Wii,N/A,Sports,Nintendo,1,1,1,1,4\n\
             E,Wii,2008,Sports,Nintendo,1,1,1,1,4\n\
             F,Wii,2009,Sports,Nintendo,1,1,1,1,4\n\
             G,Wii,2010,Sports,Nintendo,1,1,1,1,4",
        );
        let table = preprocess(&raw, 5);

        assert_eq!(table.len(), 3);
        let names: Vec<_> = table.column(NAME).cloned().collect();
        assert_eq!(names, vec![Value::from("A"), Value::from("C"), Value::from("E")]);
    }

    #[test]
    fn rows_are_renumbered_densely() {
        let raw = csv(
            "A,Wii,,Sports,Nintendo,1,1,1,1,4\n\
             B,Wii,2006,Sports,Nintendo,1,1,1,1,4\n\
             C,Wii,,Sports,Nintendo,1,1,1,1,4\n\
             D,Wii,2007,Sports,Nintendo,1,1,1,1,4",
        );
        let table = preprocess(&raw, 100);
        let labels: Vec<_> = table.records().iter().map(|r| r.index).collect();
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn missing_publisher_becomes_unknown() {
        let raw = csv(
            "A,Wii,2006,Sports,,1,1,1,1,4\n\
             B,Wii,2006,Sports,Nintendo,1,1,1,1,4\n\
             C,Wii,2006,Sports,N/A,1,1,1,1,4",
        );
        let table = preprocess(&raw, 100);
        let publishers: Vec<_> = table.column(PUBLISHER).cloned().collect();
        assert_eq!(
            publishers,
            vec![
                Value::from(UNKNOWN_PUBLISHER),
                Value::from("Nintendo"),
                Value::from(UNKNOWN_PUBLISHER)
            ]
        );
    }

    #[test]
    fn sales_are_finite_and_non_negative() {
        let raw = csv(
            "A,Wii,2006,Sports,Nintendo,-1,abc,,0.5,NaN\n\
             B,Wii,2006,Sports,Nintendo,inf,2,-0.25,1e400,x1",
        );
        let table = preprocess(&raw, 100);

        for col in SALES_LIKE {
            for v in table.column(col) {
                let v = v.as_f64().unwrap();
                assert!(v.is_finite() && v >= 0.0, "{col} = {v}");
            }
        }
        assert_eq!(float(&table, 0, "EU_Sales"), 0.0);
        assert_eq!(float(&table, 1, "EU_Sales"), 2.0);
        assert_eq!(float(&table, 0, "Other_Sales"), 0.5);
    }

    #[test]
    fn decade_follows_year() {
        let raw = csv(
            "A,NES,1985,Platform,Nintendo,1,1,1,1,4\n\
             B,PS4,2019.0,Action,Sony,1,1,1,1,4\n\
             C,GB,1990,Puzzle,Nintendo,1,1,1,1,4",
        );
        let table = preprocess(&raw, 100);
        for row in 0..table.len() {
            let year = int(&table, row, YEAR);
            assert_eq!(int(&table, row, DECADE), (year / 10) * 10);
        }
        assert_eq!(int(&table, 1, YEAR), 2019);
        assert_eq!(decade(-5), -10);
    }

    #[test]
    fn total_is_sum_of_regions() {
        let raw = csv(
            "A,Wii,2006,Sports,Nintendo,41.49,29.02,3.77,8.46,82.74\n\
             B,NES,1985,Platform,Nintendo,29.08,3.58,6.81,0.77,40.24",
        );
        let table = preprocess(&raw, 100);
        for row in 0..table.len() {
            let sum: f64 = REGIONAL_SALES.iter().map(|c| float(&table, row, c)).sum();
            assert!((float(&table, row, TOTAL_REGIONAL_SALES) - sum).abs() < 1e-9);
        }
        assert_eq!(table.schema().names().last().unwrap(), TOTAL_REGIONAL_SALES);
    }

    #[test]
    fn negative_region_lowers_total_before_clamping() {
        let raw = csv("A,Wii,2006,Sports,Nintendo,-1,2,0.5,0.5,2");
        let table = preprocess(&raw, 100);
        assert_eq!(float(&table, 0, "NA_Sales"), 0.0);
        assert_eq!(float(&table, 0, TOTAL_REGIONAL_SALES), 2.0);
    }

    #[test]
    fn steps_are_skipped_for_absent_columns() {
        let raw = read_csv("Name,Platform,Score\nPong,2600,\nTetris,GB,9.5\n".as_bytes()).unwrap();
        let table = preprocess(&raw, 100);

        assert_eq!(table.len(), 2);
        assert_eq!(table.schema().names(), [NAME, PLATFORM, "Score"]);
        assert_eq!(table.value(0, PLATFORM), Some(&Value::from("2600")));
        // Extra columns pass through untouched.
        assert_eq!(table.value(0, "Score"), Some(&Value::Null));
        assert_eq!(table.value(1, "Score"), Some(&Value::Float(9.5)));
    }

    #[test]
    fn total_needs_all_four_regions() {
        let raw = read_csv("Year,NA_Sales,EU_Sales,JP_Sales\n2000,1,1,1\n".as_bytes()).unwrap();
        let table = preprocess(&raw, 100);
        assert!(!table.has_column(TOTAL_REGIONAL_SALES));
    }

    #[test]
    fn unreadable_years_drop_the_row() {
        let raw = RawTable::new(
            Schema::new([YEAR]),
            vec![
                vec![Value::from(" 2001 ")],
                vec![Value::from("soon")],
                vec![Value::Float(f64::NAN)],
                vec![Value::Bool(true)],
                vec![Value::Float(1999.0)],
            ],
        );
        let table = preprocess(&raw, 100);
        let years: Vec<_> = table.column(YEAR).cloned().collect();
        assert_eq!(years, vec![Value::Integer(2001), Value::Integer(1999)]);
    }

    #[test]
    fn out_of_range_years_drop_the_row() {
        let raw = RawTable::new(
            Schema::new([YEAR]),
            vec![
                vec![Value::Float(-1e30)],
                vec![Value::Integer(i64::MIN)],
                vec![Value::Integer(i64::MAX)],
                vec![Value::from("-9223372036854775808")],
                vec![Value::Integer(-5)],
            ],
        );
        let table = preprocess(&raw, 100);
        assert_eq!(table.len(), 1);
        assert_eq!(int(&table, 0, YEAR), -5);
        assert_eq!(int(&table, 0, DECADE), -10);
    }

    #[test]
    fn negative_zero_sales_become_zero() {
        let raw = RawTable::new(
            Schema::new([YEAR, GLOBAL_SALES]),
            vec![vec![Value::Integer(2000), Value::Float(-0.0)]],
        );
        let table = preprocess(&raw, 100);
        let sales = float(&table, 0, GLOBAL_SALES);
        assert_eq!(sales, 0.0);
        assert!(sales.is_sign_positive());
    }

    #[test]
    fn preprocessing_is_deterministic_and_leaves_input_alone() {
        let raw = csv(
            "A,Wii,,Sports,,-1,1,1,1,4\n\
             B,Wii,2006,Sports,Nintendo,1,1,1,1,4",
        );
        let snapshot = raw.clone();
        assert_eq!(preprocess(&raw, 100), preprocess(&raw, 100));
        assert_eq!(raw, snapshot);
    }

    #[test]
    fn zero_limit_yields_empty_table() {
        let raw = csv("A,Wii,2006,Sports,Nintendo,1,1,1,1,4");
        let table = preprocess(&raw, 0);
        assert!(table.is_empty());
        assert!(table.has_column(DECADE));
    }
}
