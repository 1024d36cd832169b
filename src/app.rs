use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use eframe::egui;

use crate::config::ViewerConfig;
use crate::data::loader::{spawn_load, LoadError, Source};
use crate::data::model::Leaderboard;
use crate::state::{AppState, ViewEvent};
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct LeaderboardApp {
    pub state: AppState,
    config: ViewerConfig,
    /// Outstanding background load, if any.
    pending: Option<Receiver<Result<Leaderboard, LoadError>>>,
}

impl LeaderboardApp {
    pub fn new(config: ViewerConfig) -> Self {
        let mut app = Self {
            state: AppState::default(),
            config,
            pending: None,
        };
        if app.config.load_on_start {
            let source = app.config.source();
            app.start_load(source);
        }
        app
    }

    fn start_load(&mut self, source: Source) {
        self.state.begin_loading();
        self.pending = Some(spawn_load(source));
    }

    /// Hand a finished load to the state; keep repainting while it runs.
    fn poll_pending(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.pending else {
            return;
        };
        let event = match rx.try_recv() {
            Ok(Ok(board)) => ViewEvent::Loaded(board),
            Ok(Err(e)) => ViewEvent::LoadFailed(format!("{:#}", anyhow::Error::new(e))),
            Err(TryRecvError::Disconnected) => ViewEvent::LoadFailed(LoadError::Worker.to_string()),
            Err(TryRecvError::Empty) => {
                ctx.request_repaint_after(Duration::from_millis(100));
                return;
            }
        };
        self.pending = None;
        self.state.apply(event);
    }
}

impl eframe::App for LeaderboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending(ctx);

        // ---- Top panel: menu bar and status ----
        let configured = self.config.source();
        let requested = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state, &configured))
            .inner;
        if let Some(source) = requested {
            self.start_load(source);
        }

        // ---- Left side panel: filters and column toggles ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: leaderboard table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::leaderboard_table(ui, &mut self.state);
        });
    }
}
