use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::Source;

/// Optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "leaderboard-viewer.json";

// ---------------------------------------------------------------------------
// Viewer configuration
// ---------------------------------------------------------------------------

/// Startup settings.  Every field may be omitted from the JSON file.
///
/// ```json
/// { "source": "https://example.org/leaderboard/leaderboard.csv", "load_on_start": true }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// URL or filesystem path of the leaderboard CSV.
    pub source: String,
    /// Fetch `source` as soon as the window opens.
    pub load_on_start: bool,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            source: "leaderboard/leaderboard.csv".to_string(),
            load_on_start: true,
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Read `path` when it exists; fall back to defaults otherwise or when it
    /// cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No {} found, using default configuration", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }

    pub fn source(&self) -> Source {
        Source::parse(&self.source)
    }
}
