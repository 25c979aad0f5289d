//! Render-time merge inference for body cells.
//!
//! Spans are a projection of the normalized rows plus a [`MergeConfig`]; they are
//! recomputed on every render and never stored alongside the data.

use std::collections::BTreeSet;

/// One rendered (or absorbed) table cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellSpan {
    /// Cell text
    pub text: String,
    /// Number of rows covered, at least 1
    pub row_span: usize,
    /// Number of columns covered, at least 1
    pub col_span: usize,
    /// False when an earlier cell's span absorbs this one
    pub render: bool,
}

impl CellSpan {
    /// An unmerged, rendered cell.
    pub fn single(text: &str) -> Self {
        CellSpan {
            text: text.to_owned(),
            row_span: 1,
            col_span: 1,
            render: true,
        }
    }
}

/// Caller-supplied merge policy, constant for one render pass.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeConfig {
    /// Columns (0-based) whose repeated values collapse vertically
    pub merge_columns: BTreeSet<usize>,
    /// Treat a blank cell under a value as part of that value's run
    pub blank_as_continuation: bool,
    /// Keep leading empty rows and columns when trimming
    pub preserve_leading: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        MergeConfig {
            merge_columns: BTreeSet::from([0]),
            blank_as_continuation: true,
            preserve_leading: false,
        }
    }
}

/// Builds the span matrix for `rows`, collapsing vertical runs in the merge columns.
///
/// A run starts at a non-empty cell and extends over following cells that repeat
/// the value exactly, or are blank when `blank_as_continuation` is set. The first
/// cell of a run gets the run length as its row span; the rest are absorbed.
/// A blank cell that no run covers stays a rendered run of its own.
pub fn compute_row_spans(rows: &[Vec<String>], config: &MergeConfig) -> Vec<Vec<CellSpan>> {
    let mut cells: Vec<Vec<CellSpan>> = rows
        .iter()
        .map(|row| row.iter().map(|text| CellSpan::single(text)).collect())
        .collect();

    for &col in &config.merge_columns {
        let mut row = 0;
        while row < rows.len() {
            let Some(base) = rows[row].get(col) else {
                row += 1;
                continue;
            };
            let mut end = row + 1;
            if !base.is_empty() {
                while end < rows.len() {
                    let Some(next) = rows[end].get(col) else {
                        break;
                    };
                    if next == base || (next.is_empty() && config.blank_as_continuation) {
                        end += 1;
                    } else {
                        break;
                    }
                }
            }
            cells[row][col].row_span = end - row;
            for absorbed in &mut cells[row + 1..end] {
                absorbed[col].render = false;
            }
            row = end;
        }
    }
    cells
}

/// Returns the contiguous column ranges sharing one non-empty top header label,
/// skipping ranges of a single column.
pub(crate) fn header_groups(header_top: &[String]) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut start = 0;
    while start < header_top.len() {
        let end = start
            + header_top[start..]
                .iter()
                .take_while(|label| **label == header_top[start])
                .count();
        if end - start > 1 && !header_top[start].is_empty() {
            groups.push((start, end));
        }
        start = end;
    }
    groups
}

/// Merges body cells horizontally across header groups.
///
/// For each group and row, the first cell must be non-empty and every other cell of
/// the group empty; the first cell then spans the group. Rows with any other
/// content, or with a cell already involved in a vertical merge, are left alone.
pub fn compute_col_spans(header_top: &[String], cells: &mut [Vec<CellSpan>]) {
    for (start, end) in header_groups(header_top) {
        for row in cells.iter_mut() {
            let Some(group) = row.get_mut(start..end) else {
                continue;
            };
            let untouched = group.iter().all(|cell| cell.render && cell.row_span == 1);
            let (first, rest) = group.split_at_mut(1);
            if untouched
                && !first[0].text.is_empty()
                && rest.iter().all(|cell| cell.text.is_empty())
            {
                first[0].col_span = end - start;
                for cell in rest {
                    cell.render = false;
                }
            }
        }
    }
}
