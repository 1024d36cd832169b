use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::data::build_view;
use crate::data::filter::{DateFilter, FilterSpec, ModelFilter};
use crate::data::model::{ColumnKey, Leaderboard, SortKey};
use crate::data::rank::{RankedRow, SortState};

/// Shown instead of the table when the feed could not be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load leaderboard.";

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Everything that can change what the table shows.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    Loaded(Leaderboard),
    LoadFailed(String),
    SetModelFilter(ModelFilter),
    SetDateFilter(DateFilter),
    SetSearch(String),
    SortClicked(SortKey),
    SetColumnVisible(ColumnKey, bool),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    /// Loaded leaderboard (None until the feed arrives).
    pub dataset: Option<Leaderboard>,

    /// Model / date / search filters.
    pub filters: FilterSpec,

    /// Active sort column and direction.
    pub sort: SortState,

    /// Columns the user switched off.
    pub hidden_columns: BTreeSet<ColumnKey>,

    /// Filtered, sorted and ranked rows (cached).
    pub view: Vec<RankedRow>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a load is outstanding.  Controls are inert meanwhile.
    pub loading: bool,
}

impl AppState {
    pub fn apply(&mut self, event: ViewEvent) {
        self.apply_at(event, Utc::now());
    }

    /// Apply an event and rebuild the view, with `now` as the date-filter
    /// reference point.
    pub fn apply_at(&mut self, event: ViewEvent, now: DateTime<Utc>) {
        match event {
            ViewEvent::Loaded(dataset) => {
                self.dataset = Some(dataset);
                self.status_message = None;
                self.loading = false;
            }
            ViewEvent::LoadFailed(reason) => {
                log::error!("Failed to load leaderboard: {reason}");
                self.dataset = None;
                self.status_message = Some(LOAD_FAILED_MESSAGE.to_string());
                self.loading = false;
            }
            ViewEvent::SetModelFilter(model) => self.filters.model = model,
            ViewEvent::SetDateFilter(date) => self.filters.date = date,
            ViewEvent::SetSearch(search) => self.filters.search = search,
            ViewEvent::SortClicked(key) => self.sort = self.sort.clicked(key),
            ViewEvent::SetColumnVisible(column, visible) => {
                if visible {
                    self.hidden_columns.remove(&column);
                } else {
                    self.hidden_columns.insert(column);
                }
            }
        }
        self.refilter(now);
    }

    /// Recompute `view` after any change.
    fn refilter(&mut self, now: DateTime<Utc>) {
        self.view = match &self.dataset {
            Some(ds) => build_view(&ds.records, &self.filters, self.sort, now),
            None => Vec::new(),
        };
        log::debug!(
            "View rebuilt: {} rows, sort {} {:?}",
            self.view.len(),
            self.sort.key,
            self.sort.dir
        );
    }

    /// Mark a load as outstanding.
    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.status_message = None;
    }

    pub fn is_visible(&self, column: ColumnKey) -> bool {
        !self.hidden_columns.contains(&column)
    }

    /// Visible columns in display order.
    pub fn visible_columns(&self) -> Vec<ColumnKey> {
        ColumnKey::ALL
            .into_iter()
            .filter(|c| self.is_visible(*c))
            .collect()
    }

    /// Selector entries: `"all"` followed by every distinct model.
    pub fn model_options(&self) -> Vec<String> {
        let mut options = vec!["all".to_string()];
        if let Some(ds) = &self.dataset {
            options.extend(ds.distinct_models());
        }
        options
    }

    /// Result count line, or the error message when loading failed.
    pub fn status_line(&self) -> String {
        if let Some(msg) = &self.status_message {
            return msg.clone();
        }
        if self.loading {
            return "Loading…".to_string();
        }
        match self.view.len() {
            0 => "No results".to_string(),
            n => format!("{n} result(s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_text;
    use crate::data::model::SortDir;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()
    }

    fn loaded() -> AppState {
        let mut state = AppState::default();
        let board = load_text(
            "team,type,model,macro_f1,timestamp_utc\n\
             beta,human,GNN,70,2024-06-20\n\
             Alpha,llm,MLP,90,not-a-date\n\
             gamma,human,gnn,90,2024-02-01\n",
        );
        state.apply_at(ViewEvent::Loaded(board), now());
        state
    }

    fn teams(state: &AppState) -> Vec<&str> {
        state.view.iter().map(|r| r.record.team.as_str()).collect()
    }

    #[test]
    fn load_builds_default_view() {
        let state = loaded();
        assert_eq!(teams(&state), vec!["Alpha", "gamma", "beta"]);
        let ranks: Vec<usize> = state.view.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3]);
        assert_eq!(state.status_line(), "3 result(s)");
        assert_eq!(state.model_options(), vec!["all", "gnn", "mlp"]);
    }

    #[test]
    fn team_header_click_sorts_ascending_then_descending() {
        let mut state = loaded();
        state.apply_at(ViewEvent::SortClicked(SortKey::Team), now());
        assert_eq!(state.sort.dir, SortDir::Asc);
        assert_eq!(teams(&state), vec!["Alpha", "beta", "gamma"]);
        let ranks: Vec<usize> = state.view.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);

        state.apply_at(ViewEvent::SortClicked(SortKey::Team), now());
        assert_eq!(state.sort.dir, SortDir::Desc);
        assert_eq!(teams(&state), vec!["gamma", "beta", "Alpha"]);
    }

    #[test]
    fn filters_rerun_the_pipeline() {
        let mut state = loaded();
        state.apply_at(ViewEvent::SetModelFilter(ModelFilter::from_selection("gnn")), now());
        assert_eq!(teams(&state), vec!["gamma", "beta"]);

        state.apply_at(ViewEvent::SetDateFilter(DateFilter::Last30), now());
        assert_eq!(teams(&state), vec!["beta"]);
        assert_eq!(state.view[0].rank, 1);

        state.apply_at(ViewEvent::SetSearch("zzz".to_string()), now());
        assert_eq!(state.status_line(), "No results");

        state.apply_at(ViewEvent::SetModelFilter(ModelFilter::All), now());
        state.apply_at(ViewEvent::SetDateFilter(DateFilter::All), now());
        state.apply_at(ViewEvent::SetSearch(String::new()), now());
        assert_eq!(state.view.len(), 3);
    }

    #[test]
    fn column_toggles_only_affect_visibility() {
        let mut state = loaded();
        let before = state.view.clone();
        let type_col = ColumnKey::Field(SortKey::Type);

        state.apply_at(ViewEvent::SetColumnVisible(type_col, false), now());
        state.apply_at(ViewEvent::SetColumnVisible(ColumnKey::Rank, false), now());
        assert!(!state.is_visible(type_col));
        assert_eq!(state.visible_columns().len(), ColumnKey::ALL.len() - 2);
        assert_eq!(state.view, before);

        state.apply_at(ViewEvent::SetColumnVisible(type_col, true), now());
        assert!(state.is_visible(type_col));
        assert!(!state.is_visible(ColumnKey::Rank));
    }

    #[test]
    fn load_failure_is_a_visible_status() {
        let mut state = loaded();
        state.begin_loading();
        assert!(state.loading);
        assert_eq!(state.status_line(), "Loading…");

        state.apply_at(ViewEvent::LoadFailed("connection refused".to_string()), now());
        assert!(!state.loading);
        assert!(state.dataset.is_none());
        assert!(state.view.is_empty());
        assert_eq!(state.status_line(), LOAD_FAILED_MESSAGE);
    }

    #[test]
    fn events_before_load_leave_an_empty_view() {
        let mut state = AppState::default();
        state.apply_at(ViewEvent::SortClicked(SortKey::Team), now());
        assert!(state.view.is_empty());
        assert_eq!(state.model_options(), vec!["all"]);
    }
}
