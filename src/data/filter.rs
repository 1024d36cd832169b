use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::model::Record;

// ---------------------------------------------------------------------------
// Filter predicates
// ---------------------------------------------------------------------------

/// Model selector value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelFilter {
    #[default]
    All,
    /// Exact model name, stored lowercase.
    Model(String),
}

impl ModelFilter {
    /// Build a filter from a selector value; `"all"` means no constraint.
    pub fn from_selection(value: &str) -> Self {
        if value == "all" {
            ModelFilter::All
        } else {
            ModelFilter::Model(value.to_lowercase())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ModelFilter::All => "all",
            ModelFilter::Model(m) => m,
        }
    }

    fn matches(&self, record: &Record) -> bool {
        match self {
            ModelFilter::All => true,
            ModelFilter::Model(m) => record.model.to_lowercase() == *m,
        }
    }
}

/// Submission age window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Last30,
    Last180,
}

impl DateFilter {
    pub const ALL: [DateFilter; 3] = [DateFilter::All, DateFilter::Last30, DateFilter::Last180];

    pub fn label(self) -> &'static str {
        match self {
            DateFilter::All => "All time",
            DateFilter::Last30 => "Last 30 days",
            DateFilter::Last180 => "Last 180 days",
        }
    }

    /// Oldest age (in days) that still passes, `None` for no bound.
    pub fn max_age_days(self) -> Option<f64> {
        match self {
            DateFilter::All => None,
            DateFilter::Last30 => Some(30.0),
            DateFilter::Last180 => Some(180.0),
        }
    }
}

/// All active filters.  They combine with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub model: ModelFilter,
    pub date: DateFilter,
    pub search: String,
}

impl FilterSpec {
    /// Whether a record passes every filter, measured against `now`.
    pub fn matches(&self, record: &Record, now: DateTime<Utc>) -> bool {
        if !self.model.matches(record) {
            return false;
        }

        if let Some(max_days) = self.date.max_age_days() {
            if age_days(&record.timestamp_utc, now) > max_days {
                return false;
            }
        }

        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() {
            let haystack = format!(
                "{} {} {} {}",
                record.team, record.entry_type, record.model, record.timestamp_utc
            )
            .to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }

        true
    }
}

/// Return indices of records that pass all active filters, in input order.
pub fn filtered_indices(records: &[Record], filters: &FilterSpec, now: DateTime<Utc>) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| filters.matches(r, now))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Date-time layouts without an offset; interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a submission timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS UTC` as written by the leaderboard
/// updater, and plain ISO date / date-time forms.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = s
        .strip_suffix(" UTC")
        .or_else(|| s.strip_suffix('Z'))
        .unwrap_or(s);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(naive, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(|dt| dt.and_utc())
}

/// Fractional days between the timestamp and `now`.  Unparsable timestamps
/// are infinitely old.
pub fn age_days(timestamp: &str, now: DateTime<Utc>) -> f64 {
    match parse_timestamp(timestamp) {
        Some(dt) => (now - dt).num_milliseconds() as f64 / 86_400_000.0,
        None => f64::INFINITY,
    }
}
