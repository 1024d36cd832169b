use super::model::{RawRow, Record};

/// Placeholder for a missing or empty `type`.
pub const DEFAULT_TYPE: &str = "N/A";
/// Placeholder for a missing or empty score.  Parses to `0.0`.
pub const DEFAULT_SCORE: &str = "0.0";

/// Turn one parsed row into a [`Record`], or `None` when it has no team.
///
/// Defaults are applied to the raw strings: an empty `type` becomes `"N/A"`,
/// an empty score becomes `"0.0"`.  `model` is lowercased.
pub fn normalize_row(row: &RawRow) -> Option<Record> {
    let get = |name: &str| row.get(name).map(String::as_str).unwrap_or("");
    let or_default = |name: &str, default: &str| {
        let value = get(name);
        let value = if value.is_empty() { default } else { value };
        value.to_string()
    };

    let team = get("team");
    if team.is_empty() {
        return None;
    }

    Some(Record {
        team: team.to_string(),
        entry_type: or_default("type", DEFAULT_TYPE),
        model: get("model").to_lowercase(),
        macro_f1: or_default("macro_f1", DEFAULT_SCORE),
        accuracy: or_default("accuracy", DEFAULT_SCORE),
        precision: or_default("precision", DEFAULT_SCORE),
        recall: or_default("recall", DEFAULT_SCORE),
        timestamp_utc: get("timestamp_utc").to_string(),
    })
}

/// Normalise every row, dropping team-less rows and keeping the rest in order.
pub fn normalize_rows<'a>(rows: impl IntoIterator<Item = &'a RawRow>) -> Vec<Record> {
    rows.into_iter().filter_map(normalize_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SortKey;
    use crate::data::parser::parse_csv;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fills_defaults_and_lowercases_model() {
        let record = normalize_row(&row(&[("team", "A"), ("model", "GraphSAGE")])).unwrap();
        assert_eq!(record.team, "A");
        assert_eq!(record.entry_type, "N/A");
        assert_eq!(record.model, "graphsage");
        assert_eq!(record.macro_f1, "0.0");
        assert_eq!(record.accuracy, "0.0");
        assert_eq!(record.precision, "0.0");
        assert_eq!(record.recall, "0.0");
        assert_eq!(record.timestamp_utc, "");
    }

    #[test]
    fn default_scores_parse_to_zero() {
        let record = normalize_row(&row(&[("team", "A"), ("recall", "")])).unwrap();
        for key in [SortKey::MacroF1, SortKey::Accuracy, SortKey::Precision, SortKey::Recall] {
            assert_eq!(record.score(key), Some(0.0));
        }
    }

    #[test]
    fn present_values_are_copied_verbatim() {
        let record = normalize_row(&row(&[
            ("team", "Team X"),
            ("type", "human"),
            ("macro_f1", "abc"),
            ("timestamp_utc", "2024-01-01 10:00:00 UTC"),
        ]))
        .unwrap();
        assert_eq!(record.team, "Team X");
        assert_eq!(record.entry_type, "human");
        assert_eq!(record.macro_f1, "abc");
        assert_eq!(record.timestamp_utc, "2024-01-01 10:00:00 UTC");
    }

    #[test]
    fn drops_exactly_team_less_rows_preserving_order() {
        let text = "team,model,macro_f1\nA,gnn,1\n,gnn,99\nB,mlp,2\n\"\",x,3\nC,,4\n";
        let rows = parse_csv(text);
        let records = normalize_rows(&rows);
        let teams: Vec<&str> = records.iter().map(|r| r.team.as_str()).collect();
        assert_eq!(teams, vec!["A", "B", "C"]);
    }

    #[test]
    fn missing_team_column_drops_everything() {
        let rows = parse_csv("name,model\nA,gnn\n");
        assert!(normalize_rows(&rows).is_empty());
    }
}
