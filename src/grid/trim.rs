//! Grid trimming: sanitizes cells, drops leading blank rows/columns and pads ragged rows.

use crate::grid::sanitize::sanitize;

/// Returns true if every cell of the row is empty.
#[inline]
pub(crate) fn is_empty_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// Normalizes a raw grid into a rectangular one.
///
/// Every cell is sanitized first. Unless `preserve_leading` is set, leading rows
/// and leading columns that are empty everywhere are dropped. All rows are padded
/// with empty strings to the width of the widest row.
///
/// Returns `None` when no non-empty row remains, which callers treat as an empty
/// source rather than an error.
pub fn trim(raw: &[Vec<String>], preserve_leading: bool) -> Option<Vec<Vec<String>>> {
    let mut rows: Vec<Vec<String>> = raw
        .iter()
        .map(|row| row.iter().map(|cell| sanitize(cell)).collect())
        .collect();

    let first = rows.iter().position(|row| !is_empty_row(row))?;
    if !preserve_leading {
        rows.drain(..first);
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }

    if !preserve_leading {
        let leading = (0..width)
            .take_while(|&col| rows.iter().all(|row| row[col].is_empty()))
            .count();
        if leading > 0 {
            for row in rows.iter_mut() {
                row.drain(..leading);
            }
        }
    }
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn trim_drops_leading_rows_and_columns() {
        let raw = grid(&[
            &["", "", ""],
            &["", " ", ""],
            &["", "Parameter", "Value"],
            &["", "Power", "50", "mW"],
        ]);
        let trimmed = trim(&raw, false).unwrap();
        assert_eq!(trimmed, grid(&[
            &["Parameter", "Value", ""],
            &["Power", "50", "mW"],
        ]));
    }

    #[test]
    fn trim_preserve_leading_only_pads() {
        let raw = grid(&[
            &[""],
            &["", "Parameter", "Value"],
        ]);
        let trimmed = trim(&raw, true).unwrap();
        assert_eq!(trimmed, grid(&[
            &["", "", ""],
            &["", "Parameter", "Value"],
        ]));
    }

    #[test]
    fn trim_keeps_inner_blank_rows() {
        let raw = grid(&[&["A"], &[""], &["B"]]);
        assert_eq!(trim(&raw, false).unwrap().len(), 3);
    }

    #[test]
    fn trim_empty_source() {
        assert_eq!(trim(&[], false), None);
        assert_eq!(trim(&grid(&[&["", "\u{A0}"], &[]]), false), None);
        assert_eq!(trim(&grid(&[&["", " "]]), true), None);
    }

    fn raw_grid() -> impl Strategy<Value = Vec<Vec<String>>> {
        let cell = prop_oneof![
            Just(String::new()),
            Just(" ".to_owned()),
            Just("\u{A0}".to_owned()),
            "[a-c]{1,3}",
        ];
        prop::collection::vec(prop::collection::vec(cell, 0..5), 0..6)
    }

    proptest! {
        #[test]
        fn trim_is_idempotent(raw in raw_grid(), preserve in any::<bool>()) {
            let once = trim(&raw, preserve);
            if let Some(rows) = &once {
                prop_assert_eq!(trim(rows, preserve), once.clone());
            }
        }

        #[test]
        fn trim_pads_every_row_to_the_same_width(raw in raw_grid(), preserve in any::<bool>()) {
            if let Some(rows) = trim(&raw, preserve) {
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                prop_assert!(rows.iter().all(|row| row.len() == width));
            }
        }
    }
}
