//! Flat CSV export of normalized tables. Spans are a render concern and are not serialized.

/// Quotes a single field, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Serializes headers and rows, quoting every field and separating lines with `\n`.
pub fn to_csv(headers: &[String], rows: &[Vec<String>]) -> String {
    std::iter::once(headers)
        .chain(rows.iter().map(Vec::as_slice))
        .map(|line| {
            line.iter()
                .map(|field| quote(field))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
