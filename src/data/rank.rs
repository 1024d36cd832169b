use std::cmp::Ordering;

use super::model::{Record, SortDir, SortKey};

// ---------------------------------------------------------------------------
// Sort state
// ---------------------------------------------------------------------------

/// Active sort column and direction.  Defaults to Macro-F1, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub dir: SortDir,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::MacroF1,
            dir: SortDir::Desc,
        }
    }
}

impl SortState {
    /// Header click: the same key flips direction, a new key starts at its
    /// default direction.
    pub fn clicked(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                dir: self.dir.toggled(),
            }
        } else {
            Self {
                key,
                dir: key.default_dir(),
            }
        }
    }

    /// Order two records under this sort.
    ///
    /// Scores that do not parse always land below parsed ones, whatever the
    /// direction.  Text compares case-insensitively.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ord = if self.key.is_metric() {
            match (a.score(self.key), b.score(self.key)) {
                (Some(av), Some(bv)) => av.partial_cmp(&bv).unwrap_or(Ordering::Equal),
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Greater,
                (Some(_), None) => return Ordering::Less,
            }
        } else {
            let av = a.field(self.key).to_lowercase();
            let bv = b.field(self.key).to_lowercase();
            av.cmp(&bv)
        };

        match self.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    }
}

/// Stable in-place sort of record indices.
pub fn sort_indices(records: &[Record], indices: &mut [usize], sort: SortState) {
    indices.sort_by(|&a, &b| sort.compare(&records[a], &records[b]));
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Display rank for every position of an already sorted sequence.
///
/// Under a Macro-F1 sort, a record whose score equals the previous record's
/// score shares its rank; any other record is ranked by its 1-based position
/// (`[90, 90, 80]` → `[1, 1, 3]`).  Under any other sort the rank is just the
/// position.
pub fn assign_ranks<'a>(sorted: impl IntoIterator<Item = &'a Record>, key: SortKey) -> Vec<usize> {
    let mut ranks = Vec::new();
    let mut last: Option<(f64, usize)> = None;

    for (idx, record) in sorted.into_iter().enumerate() {
        let position = idx + 1;
        if key != SortKey::MacroF1 {
            ranks.push(position);
            continue;
        }

        let score = record.score(SortKey::MacroF1);
        let rank = match (last, score) {
            (Some((prev, prev_rank)), Some(cur)) if prev == cur => prev_rank,
            _ => position,
        };
        // Unparsable scores never tie, not even with each other.
        last = score.map(|s| (s, rank));
        ranks.push(rank);
    }
    ranks
}

/// One row handed to the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: usize,
    pub record: Record,
}

/// Sort the given record indices and attach ranks.
pub fn rank_view(records: &[Record], mut indices: Vec<usize>, sort: SortState) -> Vec<RankedRow> {
    sort_indices(records, &mut indices, sort);
    let ranks = assign_ranks(indices.iter().map(|&i| &records[i]), sort.key);
    indices
        .into_iter()
        .zip(ranks)
        .map(|(i, rank)| RankedRow {
            rank,
            record: records[i].clone(),
        })
        .collect()
}
