use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::normalize::normalize_rows;

// ---------------------------------------------------------------------------
// RawRow – one parsed CSV line before normalisation
// ---------------------------------------------------------------------------

/// Header name → trimmed field value.  Missing trailing fields map to `""`.
pub type RawRow = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Column keys
// ---------------------------------------------------------------------------

/// A record field that the table can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SortKey {
    Team,
    Type,
    Model,
    MacroF1,
    Accuracy,
    Precision,
    Recall,
    Timestamp,
}

impl SortKey {
    /// Column name as it appears in the CSV header.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Team => "team",
            SortKey::Type => "type",
            SortKey::Model => "model",
            SortKey::MacroF1 => "macro_f1",
            SortKey::Accuracy => "accuracy",
            SortKey::Precision => "precision",
            SortKey::Recall => "recall",
            SortKey::Timestamp => "timestamp_utc",
        }
    }

    /// The four score columns compare numerically; everything else as text.
    pub fn is_metric(self) -> bool {
        matches!(
            self,
            SortKey::MacroF1 | SortKey::Accuracy | SortKey::Precision | SortKey::Recall
        )
    }

    /// Direction used when this key becomes the active sort key.
    pub fn default_dir(self) -> SortDir {
        if self.is_metric() {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn toggled(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

/// A displayed table column.  `Rank` is derived and never a sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnKey {
    Rank,
    Field(SortKey),
}

impl ColumnKey {
    /// All columns in display order.
    pub const ALL: [ColumnKey; 9] = [
        ColumnKey::Rank,
        ColumnKey::Field(SortKey::Team),
        ColumnKey::Field(SortKey::Type),
        ColumnKey::Field(SortKey::Model),
        ColumnKey::Field(SortKey::MacroF1),
        ColumnKey::Field(SortKey::Accuracy),
        ColumnKey::Field(SortKey::Precision),
        ColumnKey::Field(SortKey::Recall),
        ColumnKey::Field(SortKey::Timestamp),
    ];

    pub fn label(self) -> &'static str {
        match self {
            ColumnKey::Rank => "Rank",
            ColumnKey::Field(SortKey::Team) => "Team",
            ColumnKey::Field(SortKey::Type) => "Type",
            ColumnKey::Field(SortKey::Model) => "Model",
            ColumnKey::Field(SortKey::MacroF1) => "Macro-F1 Score",
            ColumnKey::Field(SortKey::Accuracy) => "Accuracy",
            ColumnKey::Field(SortKey::Precision) => "Precision",
            ColumnKey::Field(SortKey::Recall) => "Recall",
            ColumnKey::Field(SortKey::Timestamp) => "Date (UTC)",
        }
    }

    pub fn sort_key(self) -> Option<SortKey> {
        match self {
            ColumnKey::Rank => None,
            ColumnKey::Field(key) => Some(key),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one normalised leaderboard entry
// ---------------------------------------------------------------------------

/// A leaderboard entry with every field present.
///
/// Scores stay as the strings found in the feed (or the `"0.0"` default) and
/// are coerced on demand with [`parse_score`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub team: String,
    pub entry_type: String,
    /// Always lowercase.
    pub model: String,
    pub macro_f1: String,
    pub accuracy: String,
    pub precision: String,
    pub recall: String,
    pub timestamp_utc: String,
}

impl Record {
    /// Raw text of the given field.
    pub fn field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Team => &self.team,
            SortKey::Type => &self.entry_type,
            SortKey::Model => &self.model,
            SortKey::MacroF1 => &self.macro_f1,
            SortKey::Accuracy => &self.accuracy,
            SortKey::Precision => &self.precision,
            SortKey::Recall => &self.recall,
            SortKey::Timestamp => &self.timestamp_utc,
        }
    }

    /// Numeric value of a field, `None` when it does not start with a number.
    pub fn score(&self, key: SortKey) -> Option<f64> {
        parse_score(self.field(key))
    }
}

/// Lenient number coercion: skips surrounding whitespace and reads the
/// longest leading `[+-]digits[.digits][e[+-]digits]` prefix, or a leading
/// `[+-]Infinity`.
///
/// `"85.0"` → 85.0, `"85.0%"` → 85.0, `".5"` → 0.5, `"-Infinity"` → -∞,
/// `"n/a"` → `None`.
pub fn parse_score(s: &str) -> Option<f64> {
    // Scanned by hand: `str::parse::<f64>` also accepts "inf" and "nan".
    let s = s.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().ok()
}

// ---------------------------------------------------------------------------
// Leaderboard – the complete loaded feed
// ---------------------------------------------------------------------------

/// All normalised records, in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    pub records: Vec<Record>,
    /// Rows discarded during normalisation (no team).
    pub dropped: usize,
}

impl Leaderboard {
    /// Normalise parsed rows, keeping count of the rows that were discarded.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let total = rows.len();
        let records = normalize_rows(&rows);
        Leaderboard {
            dropped: total - records.len(),
            records,
        }
    }

    /// Distinct non-empty model names, sorted.  Feeds the model selector.
    pub fn distinct_models(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| !r.model.is_empty())
            .map(|r| r.model.clone())
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}
