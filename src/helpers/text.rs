//! Byte decoding and CSV parsing into a raw grid.

use crate::error::RustyTableError;
use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use encoding_rs::WINDOWS_1252;
use log::debug;

/// Decodes source bytes into text.
///
/// A byte order mark selects its encoding. Without one, valid UTF-8 is taken as is
/// and anything else is read as Windows-1252, which is what spreadsheet exports
/// saved on Windows usually are.
pub fn decode(bytes: &[u8]) -> String {
    if let Some((encoding, bom_length)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
        return text.into_owned();
    }
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            debug!("source is not valid UTF-8, decoding as {}", WINDOWS_1252.name());
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

/// Parses CSV text into rows of fields.
///
/// Rows may differ in length and empty trailing fields are kept; the first row is
/// data like any other, header detection happens later.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, RustyTableError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

/// Decodes and parses a CSV source in one step.
pub fn read_grid(bytes: &[u8]) -> Result<Vec<Vec<String>>, RustyTableError> {
    parse_csv(&decode(bytes))
}
