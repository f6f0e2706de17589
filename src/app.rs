use eframe::egui;
use vgsales::Arguments;

use crate::state::AppState;
use crate::ui::{overview, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesExplorerApp {
    pub state: AppState,
}

impl SalesExplorerApp {
    /// Start with the file and filters given on the command line, if any.
    pub fn new(args: &Arguments) -> Self {
        let mut state = AppState::new(args.row_limit(), args.preview);
        if let Some(path) = &args.path {
            state.open(path.clone());
            if let Some(table) = state.table.clone() {
                state.set_criteria(args.criteria(&table));
            }
        }
        Self { state }
    }
}

impl eframe::App for SalesExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            overview::overview(ui, &self.state);
        });
    }
}
