use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{DateFilter, ModelFilter};
use crate::data::loader::Source;
use crate::data::model::ColumnKey;
use crate::state::{AppState, ViewEvent};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.  Inert while a load is outstanding.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let enabled = !state.loading && state.dataset.is_some();
    ui.add_enabled_ui(enabled, |ui: &mut Ui| {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui: &mut Ui| {
                filter_widgets(ui, state);
                ui.separator();
                column_toggles(ui, state);
            });
    });
}

fn filter_widgets(ui: &mut Ui, state: &mut AppState) {
    // ---- Model selector ----
    ui.strong("Model");
    let options = state.model_options();
    let current = state.filters.model.label().to_string();
    let mut picked: Option<ModelFilter> = None;
    egui::ComboBox::from_id_salt("model_filter")
        .selected_text(&current)
        .show_ui(ui, |ui: &mut Ui| {
            for option in &options {
                if ui.selectable_label(current == *option, option).clicked() {
                    picked = Some(ModelFilter::from_selection(option));
                }
            }
        });
    if let Some(model) = picked {
        state.apply(ViewEvent::SetModelFilter(model));
    }
    ui.add_space(6.0);

    // ---- Date window ----
    ui.strong("Submitted");
    let current = state.filters.date;
    let mut picked: Option<DateFilter> = None;
    egui::ComboBox::from_id_salt("date_filter")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for option in DateFilter::ALL {
                if ui.selectable_label(current == option, option.label()).clicked() {
                    picked = Some(option);
                }
            }
        });
    if let Some(date) = picked {
        state.apply(ViewEvent::SetDateFilter(date));
    }
    ui.add_space(6.0);

    // ---- Free-text search ----
    ui.strong("Search");
    let mut search = state.filters.search.clone();
    let response = ui.add(
        egui::TextEdit::singleline(&mut search).hint_text("team, type, model or date"),
    );
    if response.changed() {
        state.apply(ViewEvent::SetSearch(search));
    }
}

fn column_toggles(ui: &mut Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Columns").strong())
        .id_salt("column_toggles")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            for column in ColumnKey::ALL {
                let mut checked = state.is_visible(column);
                if ui.checkbox(&mut checked, column.label()).changed() {
                    state.apply(ViewEvent::SetColumnVisible(column, checked));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.  Returns a source to load when the user
/// asked for one.
pub fn top_bar(ui: &mut Ui, state: &AppState, configured: &Source) -> Option<Source> {
    let mut requested = None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.add_enabled_ui(!state.loading, |ui: &mut Ui| {
            ui.menu_button("File", |ui: &mut Ui| {
                if ui.button("Open…").clicked() {
                    requested = open_file_dialog();
                    ui.close_menu();
                }
                if ui.button(format!("Reload {configured}")).clicked() {
                    requested = Some(configured.clone());
                    ui.close_menu();
                }
            });
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        }

        let status = state.status_line();
        if state.status_message.is_some() {
            ui.label(RichText::new(status).color(Color32::RED));
        } else {
            ui.label(status);
        }

        if let Some(ds) = &state.dataset {
            ui.separator();
            ui.label(format!("{} entries loaded", ds.len()));
        }
    });

    requested
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<Source> {
    rfd::FileDialog::new()
        .set_title("Open leaderboard CSV")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file()
        .map(Source::Path)
}
