use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{rank_color, ScoreScale};
use crate::data::model::{ColumnKey, SortDir, SortKey};
use crate::data::rank::RankedRow;
use crate::state::{AppState, ViewEvent};

// ---------------------------------------------------------------------------
// Leaderboard table (central panel)
// ---------------------------------------------------------------------------

/// Render the ranked rows.  Clicking a sortable header re-sorts.
pub fn leaderboard_table(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.spinner();
            } else {
                ui.heading("Open a leaderboard to view results  (File → Open…)");
            }
        });
        return;
    }

    let columns = state.visible_columns();
    if columns.is_empty() {
        ui.label("All columns are hidden.");
        return;
    }

    let scale = ScoreScale::from_rows(&state.view);
    let mut clicked: Option<SortKey> = None;

    let mut table = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
    for column in &columns {
        let width = if *column == ColumnKey::Rank { 50.0 } else { 90.0 };
        table = table.column(Column::auto().at_least(width));
    }

    table
        .header(24.0, |mut header| {
            for column in &columns {
                header.col(|ui: &mut Ui| match column.sort_key() {
                    Some(key) => {
                        let arrow = match (state.sort.key == key, state.sort.dir) {
                            (true, SortDir::Asc) => " ▲",
                            (true, SortDir::Desc) => " ▼",
                            (false, _) => "",
                        };
                        let label = RichText::new(format!("{}{arrow}", column.label())).strong();
                        if ui.button(label).clicked() {
                            clicked = Some(key);
                        }
                    }
                    None => {
                        ui.strong(column.label());
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, state.view.len(), |mut row| {
                let ranked = &state.view[row.index()];
                for column in &columns {
                    row.col(|ui: &mut Ui| cell(ui, *column, ranked, scale));
                }
            });
        });

    if let Some(key) = clicked {
        state.apply(ViewEvent::SortClicked(key));
    }
}

fn cell(ui: &mut Ui, column: ColumnKey, row: &RankedRow, scale: Option<ScoreScale>) {
    match column {
        ColumnKey::Rank => {
            let mut text = RichText::new(row.rank.to_string()).strong();
            if let Some(color) = rank_color(row.rank) {
                text = text.color(color);
            }
            ui.label(text);
        }
        ColumnKey::Field(SortKey::MacroF1) => {
            let mut text = RichText::new(&row.record.macro_f1).monospace().strong();
            if let (Some(scale), Some(value)) = (scale, row.record.score(SortKey::MacroF1)) {
                text = text.color(scale.color_for(value));
            }
            ui.label(text);
        }
        ColumnKey::Field(key) if key.is_metric() => {
            ui.label(RichText::new(row.record.field(key)).monospace());
        }
        ColumnKey::Field(key) => {
            ui.label(row.record.field(key));
        }
    }
}
