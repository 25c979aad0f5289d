//! Alternating row bands, one per top-level merged entity.

use crate::grid::span::CellSpan;

/// Visual shading of a band.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shade {
    Even,
    Odd,
}

impl Shade {
    /// Shade for a band index.
    pub const fn of(band: usize) -> Self {
        if band % 2 == 0 {
            Shade::Even
        } else {
            Shade::Odd
        }
    }

    /// CSS class used by the HTML renderer.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Shade::Even => "band-even",
            Shade::Odd => "band-odd",
        }
    }
}

/// Assigns a band index to every row.
///
/// A row whose `primary` cell is rendered and non-empty opens a new band; the rows
/// after it share that band until the next one opens. Rows before the first such
/// row are band 0, and a group opening on the very first row is band 0 as well.
pub fn compute_bands(cells: &[Vec<CellSpan>], primary: usize) -> Vec<usize> {
    let mut band = 0;
    cells
        .iter()
        .enumerate()
        .map(|(row, line)| {
            let opens = line
                .get(primary)
                .map(|cell| cell.render && !cell.text.is_empty())
                .unwrap_or(false);
            if opens && row > 0 {
                band += 1;
            }
            band
        })
        .collect()
}
