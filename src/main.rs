mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::Path;

use app::LeaderboardApp;
use config::{ViewerConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Leaderboard",
        options,
        Box::new(|_cc| Ok(Box::new(LeaderboardApp::new(config)))),
    )
}
