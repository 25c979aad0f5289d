use crate::error::RustyTableError;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Errors related to Excel-style column list parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid column list '{0}'")]
    FormatError(String),

    #[error("Reversed column range '{0}'")]
    ReversedError(String),
}

/// Column count of an Excel sheet (A..XFD); column references beyond it are rejected.
pub(crate) const MAX_COLUMNS: usize = 16384;

/// Converts column letters to a 0-based index: A = 0, Z = 25, AA = 26.
/// `None` beyond `MAX_COLUMNS`.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    letters
        .chars()
        .map(|letter| letter as usize - 'A' as usize + 1)
        .try_fold(0usize, |index, digit| index.checked_mul(26)?.checked_add(digit))
        .filter(|column| (1..=MAX_COLUMNS).contains(column))
        .map(|column| column - 1)
}

/// Converts a 1-based column number to a 0-based index. `None` beyond `MAX_COLUMNS`.
pub(crate) fn number_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|column| (1..=MAX_COLUMNS).contains(column))
        .map(|column| column - 1)
}

/// Converts a 0-based index back to column letters.
pub(crate) fn index_to_col(index: usize) -> String {
    let mut column = index + 1;
    let mut letters = String::new();
    while column > 0 {
        column -= 1;
        letters.insert(0, char::from(b'A' + (column % 26) as u8));
        column /= 26;
    }
    letters
}

/// A set of 0-based column indexes parsed from a list such as "A", "A,C", "1:3" or "A:B,E".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColumnList(pub BTreeSet<usize>);

impl TryFrom<&str> for ColumnList {
    type Error = RustyTableError;

    /// Columns are given as letters or 1-based numbers, alone or as inclusive
    /// ranges, separated by commas. An empty list selects no columns.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([A-Z]+|\d+)(:([A-Z]+|\d+))?$").expect("Hardcode regex pattern");
        let value = value.to_ascii_uppercase();
        let mut columns = BTreeSet::new();
        for item in value.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let captures = pattern
                .captures(item)
                .ok_or(RangeError::FormatError(item.to_owned()))?;
            let parse = |text: &str| {
                if text.starts_with(|c: char| c.is_ascii_digit()) {
                    number_to_index(text)
                } else {
                    col_to_index(text)
                }
            };
            let lower = captures
                .get(1)
                .and_then(|matcher| parse(matcher.as_str()))
                .ok_or(RangeError::FormatError(item.to_owned()))?;
            let upper = match captures.get(3) {
                Some(matcher) => parse(matcher.as_str()).ok_or(RangeError::FormatError(item.to_owned()))?,
                None => lower,
            };
            if upper < lower {
                Err(RangeError::ReversedError(item.to_owned()))?;
            }
            columns.extend(lower..=upper);
        }
        Ok(ColumnList(columns))
    }
}

impl fmt::Display for ColumnList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters: Vec<String> = self.0.iter().map(|index| index_to_col(*index)).collect();
        write!(f, "{}", letters.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str) -> Vec<usize> {
        ColumnList::try_from(value).unwrap().0.into_iter().collect()
    }

    #[test]
    fn column_letters_round_trip() {
        assert_eq!(col_to_index("A"), Some(0));
        assert_eq!(col_to_index("AA"), Some(26));
        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(27), "AB");
    }

    #[test]
    fn column_list_forms() {
        assert_eq!(parse("A"), vec![0]);
        assert_eq!(parse("a, c"), vec![0, 2]);
        assert_eq!(parse("1:3"), vec![0, 1, 2]);
        assert_eq!(parse("A:B,E"), vec![0, 1, 4]);
        assert!(parse("").is_empty());
    }

    #[test]
    fn column_list_errors() {
        assert!(ColumnList::try_from("A1").is_err());
        assert!(ColumnList::try_from("0").is_err());
        assert!(ColumnList::try_from("C:A").is_err());
    }

    #[test]
    fn column_list_rejects_columns_beyond_sheet() {
        assert!(ColumnList::try_from("ZZZZZZZZZZZZZZ").is_err());
        assert!(ColumnList::try_from("99999999999999999999999").is_err());
        assert!(ColumnList::try_from("1:1000000000").is_err());
        assert!(ColumnList::try_from("A:ZZZZZZ").is_err());
        assert!(ColumnList::try_from("XFE").is_err());
        assert_eq!(parse("XFD"), vec![MAX_COLUMNS - 1]);
        assert_eq!(parse("16384"), vec![MAX_COLUMNS - 1]);
    }

    #[test]
    fn column_list_display() {
        assert_eq!(ColumnList::try_from("1:2,e").unwrap().to_string(), "A,B,E");
        assert_eq!(ColumnList::default().to_string(), "");
    }
}
