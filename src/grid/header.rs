//! Header region detection, merged-cell reconstruction and header flattening.

use crate::grid::span::CellSpan;
use log::debug;
use log::warn;

/// Separator placed between header levels in a flat column label.
pub const HEADER_SEPARATOR: &str = " — ";

/// Tunable policy for the header-region heuristic.
///
/// The defaults are empirical; layouts that do not fit them should set
/// `fixed_rows` instead of relying on detection.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeaderPolicy {
    /// Maximum number of leading rows inspected.
    pub max_rows: usize,
    /// Minimum fraction of non-empty cells for a row to look like a header.
    pub min_density: f64,
    /// A narrow row with at least this many non-empty cells looks like a header regardless of density.
    pub min_cells: usize,
    /// Widest row the `min_cells` rule applies to.
    pub narrow_width: usize,
    /// Treat the first row as a header even when it does not look like one.
    /// When off, such a grid gets no header rows and `Col{n}` labels.
    pub force_first: bool,
    /// Skip detection and use exactly this many header rows.
    pub fixed_rows: Option<usize>,
}

impl Default for HeaderPolicy {
    fn default() -> Self {
        HeaderPolicy {
            max_rows: 5,
            min_density: 0.3,
            min_cells: 2,
            narrow_width: 8,
            force_first: true,
            fixed_rows: None,
        }
    }
}

impl HeaderPolicy {
    /// Returns true if the row has enough content to be a header row.
    ///
    /// The `min_cells` rule only applies to rows at most `narrow_width` wide.
    fn is_header_like(&self, row: &[String]) -> bool {
        let filled = row.iter().filter(|cell| !cell.is_empty()).count();
        if filled == 0 || row.is_empty() {
            return false;
        }
        filled as f64 / row.len() as f64 >= self.min_density
            || (row.len() <= self.narrow_width && filled >= self.min_cells)
    }
}

/// Marks the columns covered by a group label, i.e. a label followed by at least
/// one blank cell, together with those blanks. `None` when the row has no group.
fn group_columns(row: &[String]) -> Option<Vec<bool>> {
    let mut covered = vec![false; row.len()];
    let mut grouped = false;
    let mut start = 0;
    while start < row.len() {
        let end = start + 1 + row[start + 1..].iter().take_while(|cell| cell.is_empty()).count();
        if !row[start].is_empty() && end - start > 1 {
            covered[start..end].fill(true);
            grouped = true;
        }
        start = end;
    }
    grouped.then_some(covered)
}

/// Returns true if `next` holds sub-labels for the groups of `last`: `last` has
/// at least one group and `next` is blank in every column outside its groups.
fn continues_header(last: &[String], next: &[String]) -> bool {
    let Some(covered) = group_columns(last) else {
        return false;
    };
    next.iter()
        .enumerate()
        .all(|(col, cell)| cell.is_empty() || covered.get(col).copied().unwrap_or(false))
}

/// Decides how many leading rows of a trimmed grid are headers.
///
/// The first row is a header when it looks like one. The header region grows into
/// the next row only while the last header row holds group labels waiting for
/// sub-labels underneath and the next row looks like a header with content under
/// those groups only. A standalone label above a non-blank cell marks a data row.
///
/// When the first row does not look like a header, one header row is forced
/// unless `force_first` is off, in which case there are no header rows at all.
pub fn detect_header_rows(grid: &[Vec<String>], policy: &HeaderPolicy) -> usize {
    if let Some(rows) = policy.fixed_rows {
        return rows.clamp(1, grid.len().max(1));
    }
    let Some(first) = grid.first() else {
        return 1;
    };
    if !policy.is_header_like(first) {
        if policy.force_first {
            warn!("first row does not look like a header; forcing one header row");
            return 1;
        }
        debug!("first row does not look like a header; no header rows");
        return 0;
    }

    let limit = policy.max_rows.min(grid.len());
    let mut count = 1;
    while count < limit
        && policy.is_header_like(&grid[count])
        && continues_header(&grid[count - 1], &grid[count])
    {
        count += 1;
    }
    debug!("detected {} header row(s)", count);
    count
}

/// Header rows after merged-cell reconstruction, with one flat label per column.
#[derive(Clone, Debug, PartialEq)]
pub struct FilledHeader {
    /// Header rows with blanks replaced by the nearest label to their left
    pub filled: Vec<Vec<String>>,
    /// One non-empty label per column
    pub flat: Vec<String>,
}

/// Replaces every blank cell with the last non-blank cell to its left in the same row.
/// Blanks with nothing to their left stay blank.
pub fn left_fill(row: &[String]) -> Vec<String> {
    let mut last: Option<&String> = None;
    row.iter()
        .map(|cell| {
            if cell.is_empty() {
                last.cloned().unwrap_or_default()
            } else {
                last = Some(cell);
                cell.to_owned()
            }
        })
        .collect()
}

/// Left-fills every header row and joins the distinct labels of each of the
/// `width` columns.
///
/// A column with no label in any row is named `Col{n}` (1-based).
pub fn fill_and_flatten(header_rows: &[Vec<String>], width: usize) -> FilledHeader {
    let filled: Vec<Vec<String>> = header_rows.iter().map(|row| left_fill(row)).collect();
    let flat = (0..width)
        .map(|col| {
            let mut labels: Vec<&str> = Vec::new();
            for row in &filled {
                if let Some(label) = row.get(col).filter(|label| !label.is_empty()) {
                    if !labels.contains(&label.as_str()) {
                        labels.push(label);
                    }
                }
            }
            if labels.is_empty() {
                format!("Col{}", col + 1)
            } else {
                labels.join(HEADER_SEPARATOR)
            }
        })
        .collect();
    FilledHeader { filled, flat }
}

/// Computes the rendered header tree from filled header rows.
///
/// A blank or repeated label below a label joins it vertically. Adjacent cells of
/// a row with the same label, the same row span and the same parent labels in
/// every row above are joined horizontally.
pub fn header_spans(filled: &[Vec<String>]) -> Vec<Vec<CellSpan>> {
    let mut cells: Vec<Vec<CellSpan>> = filled
        .iter()
        .map(|row| row.iter().map(|text| CellSpan::single(text)).collect())
        .collect();
    let width = filled.first().map(Vec::len).unwrap_or(0);

    for col in 0..width {
        let mut anchor: Option<usize> = None;
        for row in 0..filled.len() {
            let text = &filled[row][col];
            match anchor {
                Some(top) if text.is_empty() || *text == filled[top][col] => {
                    cells[top][col].row_span += 1;
                    cells[row][col].render = false;
                }
                _ => anchor = (!text.is_empty()).then_some(row),
            }
        }
    }

    for row in 0..filled.len() {
        let mut start = 0;
        while start < width {
            let mut end = start + 1;
            if cells[row][start].render && !filled[row][start].is_empty() {
                while end < width
                    && cells[row][end].render
                    && filled[row][end] == filled[row][start]
                    && cells[row][end].row_span == cells[row][start].row_span
                    && (0..row).all(|above| filled[above][end] == filled[above][start])
                {
                    end += 1;
                }
                cells[row][start].col_span = end - start;
                for cell in &mut cells[row][start + 1..end] {
                    cell.render = false;
                }
            }
            start = end;
        }
    }
    cells
}
