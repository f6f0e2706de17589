use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use vgsales::data::GenreFilter;
use vgsales::ALL_GENRES;

use crate::state::AppState;

/// Largest K offered by the top-N slider.
const MAX_TOP_N: usize = 100;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the closures.
    let genres = state.genres.clone();
    let platforms = state.platforms.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Genre ----
            ui.strong("Genre");
            let current = state.criteria.genre.clone();
            egui::ComboBox::from_id_salt("genre")
                .selected_text(current.label())
                .show_ui(ui, |ui: &mut Ui| {
                    if ui
                        .selectable_label(current == GenreFilter::All, ALL_GENRES)
                        .clicked()
                    {
                        state.set_genre(GenreFilter::All);
                    }
                    for genre in &genres {
                        if ui
                            .selectable_label(current.label() == genre, genre)
                            .clicked()
                        {
                            state.set_genre(GenreFilter::Only(genre.clone()));
                        }
                    }
                });
            ui.separator();

            // ---- Platforms (none ticked = all shown) ----
            let n_selected = state.criteria.platforms.len();
            let header_text = if n_selected == 0 {
                "Platforms  (all)".to_string()
            } else {
                format!("Platforms  ({n_selected}/{})", platforms.len())
            };
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("platforms")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    if ui.small_button("Clear").clicked() {
                        state.clear_platforms();
                    }
                    for platform in &platforms {
                        let mut checked = state.criteria.platforms.contains(platform);
                        if ui.checkbox(&mut checked, platform).changed() {
                            state.toggle_platform(platform);
                        }
                    }
                });
            ui.separator();

            // ---- Year range ----
            if let Some((lo, hi)) = state.year_bounds {
                ui.strong("Years");
                let (mut min, mut max) = state.criteria.year_range;
                min = min.clamp(lo, hi);
                max = max.clamp(lo, hi);
                let changed = ui
                    .horizontal(|ui: &mut Ui| {
                        let from = ui.add(egui::DragValue::new(&mut min).range(lo..=hi));
                        ui.label("to");
                        let to = ui.add(egui::DragValue::new(&mut max).range(lo..=hi));
                        from.changed() || to.changed()
                    })
                    .inner;
                if changed {
                    state.set_year_range(min, max);
                }
                ui.separator();
            }

            // ---- Top N ----
            let mut ranked = state.criteria.top_n.is_some();
            if ui
                .checkbox(&mut ranked, "Only top N by global sales")
                .changed()
            {
                state.set_top_n(ranked);
            }
            let slider = ui.add_enabled(
                ranked,
                egui::Slider::new(&mut state.top_n_value, 1..=MAX_TOP_N).text("N"),
            );
            if slider.changed() {
                state.set_top_n(true);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} games loaded, {} shown",
                table.len(),
                state.filtered.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}
