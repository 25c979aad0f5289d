//! # Grid Normalization Module
//!
//! Turns a loosely structured grid of strings, as exported from a spreadsheet
//! with multi-row headers and merged cells collapsed to blanks, into a table with
//! flat column labels, a header tree and body rows ready for span inference.
//!
//! Everything in this module is pure: no I/O, no shared state, no failure path.
//! An empty source yields `None` instead of an error.
pub mod band;
pub mod export;
pub mod header;
pub mod render;
pub mod sanitize;
pub mod span;
pub mod trim;

use crate::grid::band::compute_bands;
use crate::grid::header::detect_header_rows;
use crate::grid::header::fill_and_flatten;
use crate::grid::header::header_spans;
use crate::grid::header::HeaderPolicy;
use crate::grid::span::compute_col_spans;
use crate::grid::span::compute_row_spans;
use crate::grid::span::CellSpan;
use crate::grid::span::MergeConfig;
use crate::grid::trim::trim;
use log::debug;

/// Options controlling one normalization pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NormalizeOptions {
    /// Header-region heuristic
    pub header: HeaderPolicy,
    /// Keep leading empty rows and columns
    pub preserve_leading: bool,
    /// Optional table title
    pub title: Option<String>,
    /// Optional table caption
    pub caption: Option<String>,
}

/// A normalized table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableData {
    /// One label per column
    pub headers_flat: Vec<String>,
    /// Header rows after left-fill
    pub header_rows: Vec<Vec<String>>,
    /// Data rows, as wide as `headers_flat`
    pub rows: Vec<Vec<String>>,
    pub title: Option<String>,
    pub caption: Option<String>,
}

/// Runs the pipeline: sanitize and trim, detect the header region, then fill and
/// flatten the header rows.
///
/// Returns `None` when the grid holds no content at all.
pub fn normalize(raw: &[Vec<String>], options: &NormalizeOptions) -> Option<TableData> {
    let Some(mut rows) = trim(raw, options.preserve_leading) else {
        debug!("empty source grid");
        return None;
    };
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let count = detect_header_rows(&rows, &options.header);
    let data = rows.split_off(count.min(rows.len()));
    let header = fill_and_flatten(&rows, width);
    debug!(
        "normalized grid: {} column(s), {} header row(s), {} data row(s)",
        header.flat.len(),
        header.filled.len(),
        data.len(),
    );
    Some(TableData {
        headers_flat: header.flat,
        header_rows: header.filled,
        rows: data,
        title: options.title.to_owned(),
        caption: options.caption.to_owned(),
    })
}

impl TableData {
    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers_flat.len()
    }

    /// Top header row after fill, which defines the horizontal merge groups.
    pub fn header_top(&self) -> &[String] {
        self.header_rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Span matrix of the header rows.
    pub fn header_spans(&self) -> Vec<Vec<CellSpan>> {
        header_spans(&self.header_rows)
    }

    /// Span matrix of the body: vertical merges first, then horizontal ones
    /// across the groups of the filled top header row.
    pub fn cell_spans(&self, config: &MergeConfig) -> Vec<Vec<CellSpan>> {
        let mut cells = compute_row_spans(&self.rows, config);
        compute_col_spans(self.header_top(), &mut cells);
        cells
    }

    /// Band index per body row, keyed on the `primary` column.
    pub fn bands(&self, cells: &[Vec<CellSpan>], primary: usize) -> Vec<usize> {
        compute_bands(cells, primary)
    }

    /// Flat CSV export of headers and data rows.
    pub fn to_csv(&self) -> String {
        export::to_csv(&self.headers_flat, &self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn normalize_simple_table() {
        let raw = grid(&[
            &["Parameter", "Unit", "Value"],
            &["Wavelength", "nm", "1550"],
            &["Power", "mW", "50"],
        ]);
        let table = normalize(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(table.header_rows.len(), 1);
        assert_eq!(table.headers_flat, vec!["Parameter", "Unit", "Value"]);
        assert_eq!(table.rows.len(), 2);
        let cells = table.cell_spans(&MergeConfig::default());
        assert!(cells
            .iter()
            .flatten()
            .all(|cell| cell.render && cell.row_span == 1 && cell.col_span == 1));
    }

    #[test]
    fn normalize_vertical_merge() {
        let raw = grid(&[
            &["Parameter", "Condition", "Value"],
            &["Noise", "@1Hz", "10000"],
            &["", "@10Hz", "1000"],
            &["", "@100Hz", "100"],
        ]);
        let table = normalize(&raw, &NormalizeOptions::default()).unwrap();
        let cells = table.cell_spans(&MergeConfig::default());
        assert_eq!(cells[0][0].row_span, 3);
        assert!(!cells[1][0].render && !cells[2][0].render);
        assert_eq!(table.bands(&cells, 0), vec![0, 0, 0]);
    }

    #[test]
    fn normalize_group_header() {
        let raw = grid(&[
            &["Indicator", "", ""],
            &["Min", "Typical", "Max"],
            &["1", "2", "3"],
            &["4", "", ""],
        ]);
        let table = normalize(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(
            table.headers_flat,
            vec!["Indicator — Min", "Indicator — Typical", "Indicator — Max"]
        );
        assert_eq!(table.header_spans()[0][0].col_span, 3);
        let cells = table.cell_spans(&MergeConfig {
            merge_columns: Default::default(),
            ..MergeConfig::default()
        });
        assert_eq!(cells[0][0].col_span, 1);
        assert_eq!(cells[1][0].col_span, 3);
    }

    #[test]
    fn normalize_vertical_label_beside_group() {
        let raw = grid(&[
            &["Parameter", "Indicator", "", ""],
            &["", "Min", "Typical", "Max"],
            &["Noise", "1", "2", "3"],
            &["", "4", "5", "6"],
        ]);
        let table = normalize(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(table.header_rows.len(), 2);
        assert_eq!(
            table.headers_flat,
            vec!["Parameter", "Indicator — Min", "Indicator — Typical", "Indicator — Max"]
        );
        assert_eq!(table.rows.len(), 2);
        let spans = table.header_spans();
        assert_eq!(spans[0][0].row_span, 2);
        assert_eq!(spans[0][1].col_span, 3);
        let cells = table.cell_spans(&MergeConfig::default());
        assert_eq!(cells[0][0].row_span, 2);
        assert!(!cells[1][0].render);
    }

    #[test]
    fn normalize_single_header_row_groups_columns() {
        let raw = grid(&[
            &["Parameter", "Value", ""],
            &["Power", "50", ""],
            &["Energy", "3", "mJ"],
        ]);
        let table = normalize(&raw, &NormalizeOptions::default()).unwrap();
        assert_eq!(table.header_rows.len(), 1);
        assert_eq!(table.header_top(), ["Parameter", "Value", "Value"]);
        let cells = table.cell_spans(&MergeConfig::default());
        assert_eq!(cells[0][1].col_span, 2);
        assert!(!cells[0][2].render);
        assert!(cells[1].iter().all(|cell| cell.render && cell.col_span == 1));
    }

    #[test]
    fn normalize_without_header_rows() {
        let options = NormalizeOptions {
            header: HeaderPolicy {
                min_cells: 3,
                force_first: false,
                ..HeaderPolicy::default()
            },
            ..NormalizeOptions::default()
        };
        let raw = grid(&[&["Title", "", "", "", ""], &["a", "b", "c", "d", "e"]]);
        let table = normalize(&raw, &options).unwrap();
        assert!(table.header_rows.is_empty());
        assert_eq!(table.headers_flat, vec!["Col1", "Col2", "Col3", "Col4", "Col5"]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.header_spans().is_empty());
    }

    #[test]
    fn normalize_empty_source() {
        let raw = grid(&[&["", ""], &[" ", "\u{200B}"]]);
        assert_eq!(normalize(&raw, &NormalizeOptions::default()), None);
    }

    #[test]
    fn normalize_keeps_title_and_caption() {
        let options = NormalizeOptions {
            title: Some("Optical".to_owned()),
            caption: Some("Typical values at 25 °C".to_owned()),
            ..NormalizeOptions::default()
        };
        let table = normalize(&grid(&[&["A", "B"], &["1", "2"]]), &options).unwrap();
        assert_eq!(table.title.as_deref(), Some("Optical"));
        assert_eq!(table.to_csv(), "\"A\",\"B\"\n\"1\",\"2\"");
    }
}
