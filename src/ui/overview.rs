use eframe::egui::{self, ScrollArea, Ui};
use vgsales::data::Value;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Overview (central panel)
// ---------------------------------------------------------------------------

/// Render the headline metrics and the preview of the filtered rows.
pub fn overview(ui: &mut Ui, state: &AppState) {
    if state.table.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore sales  (File → Open…)");
        });
        return;
    }

    let summary = &state.summary;
    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Total games (filtered)", summary.games.to_string());
        metric(ui, "Distinct platforms", summary.distinct_platforms.to_string());
        metric(ui, "Distinct genres", summary.distinct_genres.to_string());
        metric(
            ui,
            "Total global sales (M)",
            format!("{:.2}", summary.total_global_sales),
        );
    });
    ui.separator();

    if state.filtered.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    let preview = state.filtered.head(state.preview_rows);
    ui.strong(format!(
        "First {} of {} filtered rows",
        preview.len(),
        state.filtered.len()
    ));

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("preview")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("#");
                    for name in preview.schema().names() {
                        ui.strong(name);
                    }
                    ui.end_row();

                    for record in preview.records() {
                        ui.label(record.index.to_string());
                        for cell in &record.cells {
                            match cell {
                                Value::Null => ui.weak("—"),
                                other => ui.label(other.to_string()),
                            };
                        }
                        ui.end_row();
                    }
                });
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(label);
            ui.heading(value);
        });
    });
}
