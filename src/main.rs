mod app;
mod state;
mod ui;

use std::io;

use anyhow::Context;
use app::SalesExplorerApp;
use eframe::egui;
use vgsales::data::{filter, preprocess_file, Summary, Table, Value};
use vgsales::Arguments;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Arguments::build();
    if args.summary {
        return print_summary(&args);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Video Game Sales Explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(SalesExplorerApp::new(&args)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Headless mode: metrics as JSON, then the preview as CSV.
fn print_summary(args: &Arguments) -> anyhow::Result<()> {
    let path = args.path.as_deref().context("--summary needs a data file")?;
    let table = preprocess_file(path, args.row_limit())
        .with_context(|| format!("loading {}", path.display()))?;
    let filtered = filter(&table, &args.criteria(&table));

    println!("{}", serde_json::to_string_pretty(&Summary::of(&filtered))?);
    if filtered.is_empty() {
        println!("No rows match the current filters.");
        return Ok(());
    }
    write_preview(&filtered.head(args.preview), io::stdout().lock())
}

fn write_preview<W: io::Write>(table: &Table, out: W) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = vec!["index".to_string()];
    header.extend(table.schema().names().iter().cloned());
    writer.write_record(&header)?;

    for record in table.records() {
        let mut row = vec![record.index.to_string()];
        row.extend(record.cells.iter().map(|cell| match cell {
            Value::Null => String::new(),
            // Stored value, not the rounded on-screen form.
            Value::Float(v) => v.to_string(),
            other => other.to_string(),
        }));
        writer.write_record(&row)?;
    }
    writer.flush().context("writing preview")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vgsales::data::{Record, Schema};

    #[test]
    fn preview_keeps_stored_precision() {
        let table = Table::new(
            Schema::new(["Name", "Global_Sales", "Publisher"]),
            vec![Record {
                index: 7,
                cells: vec![Value::from("Pong"), Value::Float(0.005), Value::Null],
            }],
        );
        let mut out = Vec::new();
        write_preview(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "index,Name,Global_Sales,Publisher\n7,Pong,0.005,\n"
        );
    }
}
