use super::model::RawRow;

// ---------------------------------------------------------------------------
// Delimited-text parser
// ---------------------------------------------------------------------------

/// Parse leaderboard CSV text into rows keyed by header name.
///
/// * The whole blob is trimmed, then split on `\n` or `\r\n`.
/// * The first line is the header; its comma-split tokens are the field names.
/// * Blank lines after the header are skipped.
/// * Fields are zipped against the header by position and trimmed; missing
///   trailing fields become `""`, surplus fields are ignored.
///
/// Fewer than two lines yields no rows.
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    let mut lines = text.trim().lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let header: Vec<&str> = header_line.split(',').collect();

    lines
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let fields = split_fields(line);
            header
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let value = fields.get(idx).map(|f| f.trim()).unwrap_or("");
                    (name.to_string(), value.to_string())
                })
                .collect()
        })
        .collect()
}

/// Split one line on commas outside double quotes.
///
/// Quotes only toggle the quoted state and are never emitted, so `""` inside a
/// quoted field is not an escaped quote and an unterminated quote swallows the
/// rest of the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
