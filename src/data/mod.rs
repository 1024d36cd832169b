/// Data layer: parsing, normalisation, filtering, sorting and ranking.
///
/// Architecture:
/// ```text
///  CSV text (file / HTTP)
///        │
///        ▼
///   ┌──────────┐
///   │  parser   │  text → Vec<RawRow>
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ normalize  │  drop team-less rows, fill defaults → Leaderboard
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  model / date / search predicates → indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   rank    │  sort indices, attach ranks → Vec<RankedRow>
///   └──────────┘
/// ```
///
/// Nothing here knows about egui.
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod rank;

use chrono::{DateTime, Utc};

use filter::{filtered_indices, FilterSpec};
use model::Record;
use rank::{rank_view, RankedRow, SortState};

/// Run filter → sort → rank over the full record set.
pub fn build_view(
    records: &[Record],
    filters: &FilterSpec,
    sort: SortState,
    now: DateTime<Utc>,
) -> Vec<RankedRow> {
    let indices = filtered_indices(records, filters, now);
    rank_view(records, indices, sort)
}
