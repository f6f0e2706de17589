use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{RawTable, Schema, Value};
use crate::error::{DataError, DataResult};

/// Cell texts read as missing values, the same set a dataframe CSV reader
/// treats as NA by default.
pub const NULL_TOKENS: [&str; 13] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a raw record set from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one game per line (the Kaggle `vgsales.csv` layout)
/// * `.json`    – `[{ "Name": "...", "Year": 2006, ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_file(path: &Path) -> DataResult<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataError::UnsupportedExtension(other.to_string())),
    }?;

    log::debug!(
        "Read {} raw rows from {} with columns {:?}",
        raw.len(),
        path.display(),
        raw.schema.names()
    );
    Ok(raw)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> DataResult<RawTable> {
    read_csv(File::open(path)?)
}

/// Parse CSV text with a header row. Cell types are guessed per cell;
/// a ragged row makes the whole source unreadable.
pub fn read_csv<R: Read>(source: R) -> DataResult<RawTable> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(DataError::malformed("CSV has no header row"));
    }
    let schema = Schema::new(headers.iter());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(guess_value).collect());
    }

    Ok(RawTable::new(schema, rows))
}

fn guess_value(s: &str) -> Value {
    if NULL_TOKENS.contains(&s) {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> DataResult<RawTable> {
    let text = std::fs::read_to_string(path)?;
    read_json(&text)
}

/// Expected JSON schema (records-oriented, the default `to_json(orient='records')`):
///
/// ```json
/// [
///   { "Name": "Wii Sports", "Platform": "Wii", "Year": 2006, "Global_Sales": 82.74 },
///   ...
/// ]
/// ```
///
/// Columns are collected in first-seen key order; a key missing from a
/// record reads as null.
pub fn read_json(text: &str) -> DataResult<RawTable> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root
        .as_array()
        .ok_or_else(|| DataError::malformed("expected a top-level JSON array"))?;

    let mut schema = Schema::default();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DataError::malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            schema.ensure(key);
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            schema
                .names()
                .iter()
                .map(|name| obj.get(name).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();

    Ok(RawTable::new(schema, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of flat columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); a pandas `Year` column with gaps
/// arrives as `Float64` and is repaired by preprocessing.
fn load_parquet(path: &Path) -> DataResult<RawTable> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = Schema::new(builder.schema().fields().iter().map(|f| f.name().clone()));
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_value(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable::new(schema, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &ArrayRef, row: usize) -> Value {
    if col.is_null(row) {
        return Value::Null;
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| Value::Text(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| Value::Text(a.value(row).to_string())),
        DataType::Int16 => col
            .as_primitive_opt::<Int16Type>()
            .map(|a| Value::Integer(i64::from(a.value(row)))),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| Value::Integer(i64::from(a.value(row)))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| Value::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| Value::Float(f64::from(a.value(row)))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| Value::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| Value::Bool(a.value(row))),
        other => Some(Value::Text(format!("{other:?}"))),
    };
    value.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn csv_cells_are_typed_and_na_tokens_are_null() {
        let text = "Name,Platform,Year,Publisher,Global_Sales\n\
                    Pong,2600,N/A,Atari,1.5\n\
                    Tetris,GB,1989,,abc\n";
        let raw = read_csv(text.as_bytes()).unwrap();

        assert_eq!(raw.schema.names(), ["Name", "Platform", "Year", "Publisher", "Global_Sales"]);
        assert_eq!(raw.len(), 2);
        assert_eq!(raw.rows[0][1], Value::Integer(2600));
        assert_eq!(raw.rows[0][2], Value::Null);
        assert_eq!(raw.rows[0][4], Value::Float(1.5));
        assert_eq!(raw.rows[1][3], Value::Null);
        assert_eq!(raw.rows[1][4], Value::from("abc"));
    }

    #[test]
    fn ragged_csv_is_unreadable() {
        let text = "Name,Year\nPong,1972,extra\n";
        assert!(matches!(read_csv(text.as_bytes()), Err(DataError::Csv(_))));
    }

    #[test]
    fn empty_csv_is_unreadable() {
        assert!(matches!(
            read_csv("".as_bytes()),
            Err(DataError::Malformed { .. })
        ));
    }

    #[test]
    fn json_records_union_their_keys() {
        let text = r#"[
            {"Name": "Wii Sports", "Year": 2006, "Global_Sales": 82.74},
            {"Name": "Duck Hunt", "Publisher": null, "Global_Sales": "28.31"}
        ]"#;
        let raw = read_json(text).unwrap();

        assert_eq!(raw.schema.names(), ["Name", "Year", "Global_Sales", "Publisher"]);
        assert_eq!(raw.rows[0][1], Value::Integer(2006));
        assert_eq!(raw.rows[0][3], Value::Null);
        assert_eq!(raw.rows[1][1], Value::Null);
        assert_eq!(raw.rows[1][2], Value::from("28.31"));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(read_json("{}"), Err(DataError::Malformed { .. })));
        assert!(matches!(read_json("[1, 2]"), Err(DataError::Malformed { .. })));
        assert!(matches!(read_json("not json"), Err(DataError::Json(_))));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("sales.CSV");
        let mut file = File::create(&csv_path).unwrap();
        writeln!(file, "Name,Year\nPong,1972").unwrap();
        drop(file);
        let raw = load_file(&csv_path).unwrap();
        assert_eq!(raw.rows, vec![vec![Value::from("Pong"), Value::Integer(1972)]]);

        let txt_path = dir.path().join("sales.txt");
        std::fs::write(&txt_path, "Name\n").unwrap();
        assert!(matches!(
            load_file(&txt_path),
            Err(DataError::UnsupportedExtension(ext)) if ext == "txt"
        ));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(load_file(&missing), Err(DataError::Io(_))));
    }

    #[test]
    fn parquet_columns_become_cells() {
        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema as ArrowSchema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;
        use std::sync::Arc;

        let schema = Arc::new(ArrowSchema::new(vec![
            Field::new("Name", DataType::Utf8, false),
            Field::new("Year", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Pong", "Tetris"])),
                Arc::new(Float64Array::from(vec![Some(1972.0), None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.parquet");
        let mut writer = ArrowWriter::try_new(File::create(&path).unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let raw = load_file(&path).unwrap();
        assert_eq!(raw.schema.names(), ["Name", "Year"]);
        assert_eq!(raw.rows[0], vec![Value::from("Pong"), Value::Float(1972.0)]);
        assert_eq!(raw.rows[1], vec![Value::from("Tetris"), Value::Null]);
    }
}
