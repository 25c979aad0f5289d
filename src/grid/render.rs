//! HTML emission for normalized tables. A thin adapter over the span and band engines.

use crate::grid::band::Shade;
use crate::grid::span::CellSpan;
use crate::grid::span::MergeConfig;
use crate::grid::TableData;
use quick_xml::escape::escape;

/// Markup emitted when there is nothing to show.
pub const EMPTY_MARKUP: &str = "<p class=\"table-empty\">No data available</p>";

/// Per-column horizontal alignment hint. Display only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    /// Parses `l`/`left`, `c`/`center`, `r`/`right` (case-insensitive).
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Some(Self::Left),
            "c" | "center" | "centre" => Some(Self::Center),
            "r" | "right" => Some(Self::Right),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// Rendering configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOptions {
    /// Body merge policy
    pub merge: MergeConfig,
    /// Alignment per column; missing entries get no style
    pub column_align: Vec<Align>,
    /// Column whose groups drive row banding
    pub primary_column: usize,
}

/// Writes one `<th>`/`<td>` element, skipping absorbed cells.
fn push_cell(html: &mut String, tag: &str, cell: &CellSpan, align: Option<&Align>) {
    if !cell.render {
        return;
    }
    html.push('<');
    html.push_str(tag);
    if cell.row_span > 1 {
        html.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
    }
    if cell.col_span > 1 {
        html.push_str(&format!(" colspan=\"{}\"", cell.col_span));
    }
    if let Some(align) = align {
        html.push_str(&format!(" style=\"text-align:{}\"", align.as_str()));
    }
    html.push('>');
    html.push_str(&escape(cell.text.as_str()));
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

/// Renders a table, or the empty-state markup when there is no table.
pub fn render_html(table: Option<&TableData>, options: &RenderOptions) -> String {
    let Some(table) = table else {
        return EMPTY_MARKUP.to_owned();
    };
    let mut html = String::from("<table>");

    if table.title.is_some() || table.caption.is_some() {
        html.push_str("<caption>");
        if let Some(title) = &table.title {
            html.push_str("<span class=\"table-title\">");
            html.push_str(&escape(title.as_str()));
            html.push_str("</span>");
        }
        if let Some(caption) = &table.caption {
            html.push_str("<span class=\"table-caption\">");
            html.push_str(&escape(caption.as_str()));
            html.push_str("</span>");
        }
        html.push_str("</caption>");
    }

    let header = table.header_spans();
    if !header.is_empty() {
        html.push_str("<thead>");
        for line in header {
            html.push_str("<tr>");
            for (col, cell) in line.iter().enumerate() {
                push_cell(&mut html, "th", cell, options.column_align.get(col));
            }
            html.push_str("</tr>");
        }
        html.push_str("</thead>");
    }

    let cells = table.cell_spans(&options.merge);
    let bands = table.bands(&cells, options.primary_column);
    html.push_str("<tbody>");
    for (line, band) in cells.iter().zip(bands) {
        html.push_str(&format!("<tr class=\"{}\">", Shade::of(band).as_str()));
        for (col, cell) in line.iter().enumerate() {
            push_cell(&mut html, "td", cell, options.column_align.get(col));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}
