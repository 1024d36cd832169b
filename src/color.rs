use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::SortKey;
use crate::data::rank::RankedRow;

// ---------------------------------------------------------------------------
// Score heat colours
// ---------------------------------------------------------------------------

/// Min / max Macro-F1 among the visible rows, used to tint score cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreScale {
    min: f64,
    max: f64,
}

impl ScoreScale {
    /// `None` when no visible row has a parseable score.
    pub fn from_rows(rows: &[RankedRow]) -> Option<Self> {
        rows.iter()
            .filter_map(|r| r.record.score(SortKey::MacroF1))
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Self>, v| {
                Some(match acc {
                    None => ScoreScale { min: v, max: v },
                    Some(s) => ScoreScale {
                        min: s.min.min(v),
                        max: s.max.max(v),
                    },
                })
            })
    }

    /// Position of `value` inside the range, 0.0 (worst) to 1.0 (best).
    pub fn fraction(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            return 1.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0) as f32
    }

    /// Red → green colour for a score.
    pub fn color_for(&self, value: f64) -> Color32 {
        let hue = self.fraction(value) * 120.0;
        let hsl = Hsl::new(hue, 0.65, 0.45);
        let rgb: Srgb = hsl.into_color();
        Color32::from_rgb(
            (rgb.red * 255.0) as u8,
            (rgb.green * 255.0) as u8,
            (rgb.blue * 255.0) as u8,
        )
    }
}

/// Podium colour for ranks 1–3.
pub fn rank_color(rank: usize) -> Option<Color32> {
    match rank {
        1 => Some(Color32::from_rgb(212, 175, 55)),
        2 => Some(Color32::from_rgb(170, 170, 180)),
        3 => Some(Color32::from_rgb(205, 127, 50)),
        _ => None,
    }
}
