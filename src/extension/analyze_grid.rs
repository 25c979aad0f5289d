//! # Analyze Grid Table Function
//!
//! `analyze_grid` describes the columns `read_grid` would produce: the flat
//! label, the header path it was built from, and whether the column takes part
//! in any merged cell of the body.
use crate::database::column::Column;
use crate::database::column::ColumnType;
use crate::error::ResultMessage;
use crate::error::RustyTableError;
use crate::extension::load_table;
use crate::extension::writer::write_to_vector;
use crate::extension::writer::Value;
use crate::extension::FileParam;
use crate::extension::GridParameters;
use crate::extension::Param;
use crate::grid::span::CellSpan;
use crate::grid::TableData;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::error::Error;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

const STEP: usize = 2048;

/// Separator between the levels of a header path.
const PATH_SEPARATOR: &str = " / ";

/// Description of one output column of `read_grid`.
#[derive(Clone, Debug, PartialEq)]
struct ColumnInfo {
    /// 1-based position
    index: i64,
    name: String,
    /// Non-empty filled header values, top to bottom
    header_path: String,
    /// Whether any body cell of the column is part of a merge
    merged: bool,
}

/// Bind data for the analyze_grid table function.
#[repr(C)]
pub(crate) struct AnalyzeGridBindData {
    infos: Vec<ColumnInfo>,
}

fn is_merged(cells: &[Vec<CellSpan>], col: usize) -> bool {
    cells.iter().filter_map(|line| line.get(col)).any(|cell| {
        !cell.render || cell.row_span > 1 || cell.col_span > 1
    })
}

impl AnalyzeGridBindData {
    fn new(table: Option<TableData>, parameters: &GridParameters) -> Self {
        let Some(table) = table else {
            return AnalyzeGridBindData { infos: vec![] };
        };
        let cells = table.cell_spans(&parameters.merge_config());
        let infos = Column::from_headers(&table.headers_flat)
            .into_iter()
            .enumerate()
            .map(|(col, column)| ColumnInfo {
                index: col as i64 + 1,
                name: column.name,
                header_path: table
                    .header_rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .filter(|label| !label.is_empty())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(PATH_SEPARATOR),
                merged: is_merged(&cells, col),
            })
            .collect();
        AnalyzeGridBindData { infos }
    }
}

impl TryFrom<&GridParameters> for AnalyzeGridBindData {
    type Error = RustyTableError;

    fn try_from(parameters: &GridParameters) -> Result<Self, Self::Error> {
        let options = parameters.normalize_options(None, None);
        let table = load_table(&parameters.file_name, &options)?;
        Ok(AnalyzeGridBindData::new(table, parameters))
    }
}

#[repr(C)]
pub(crate) struct AnalyzeGridInitData {
    index: AtomicUsize,
}

/// Table function describing the columns of a normalized grid.
pub(crate) struct AnalyzeGridTableFunction;

impl AnalyzeGridTableFunction {
    /// Fixed result schema.
    fn columns() -> [Column; 4] {
        [
            Column::new("column_index", ColumnType::BigInt),
            Column::new("column_name", ColumnType::Varchar),
            Column::new("header_path", ColumnType::Varchar),
            Column::new("merged", ColumnType::Boolean),
        ]
    }
}

impl VTab for AnalyzeGridTableFunction {
    type InitData = AnalyzeGridInitData;
    type BindData = AnalyzeGridBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = GridParameters::try_from(bind)?;
        let data = AnalyzeGridBindData::try_from(&parameters).with_prefix(parameters.file_name.as_str())?;
        for column in Self::columns() {
            bind.add_result_column(column.name.as_str(), LogicalTypeHandle::from(column.kind.to_logical_type_id()));
        }
        Ok(data)
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(AnalyzeGridInitData {
            index: AtomicUsize::new(0),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let bind = func.get_bind_data();
        let init = func.get_init_data();
        let lower = init.index.fetch_add(1, Ordering::Relaxed).saturating_mul(STEP);
        if lower >= bind.infos.len() {
            output.set_len(0);
            return Ok(());
        }

        let upper = (lower + STEP).min(bind.infos.len());
        output.set_len(upper - lower);
        let columns = Self::columns();
        let mut vectors: Vec<_> = (0..columns.len()).map(|index| output.flat_vector(index)).collect();
        for (row, info) in bind.infos[lower..upper].iter().enumerate() {
            let values = [
                Value::Integer(info.index),
                Value::Text(info.name.as_str()),
                Value::Text(info.header_path.as_str()),
                Value::Flag(info.merged),
            ];
            for ((column, vector), value) in columns.iter().zip(vectors.iter_mut()).zip(values) {
                write_to_vector(column, value, vector, row)?;
            }
        }
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            FileParam::kind(),
        ])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(GridParameters::definitions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::range::ColumnList;
    use crate::grid::header::HeaderPolicy;
    use crate::grid::normalize;
    use crate::grid::NormalizeOptions;

    fn parameters(merge_columns: Option<&str>) -> GridParameters {
        GridParameters {
            file_name: "inline.csv".to_owned(),
            header_rows: None,
            merge_columns: merge_columns.map(|text| ColumnList::try_from(text).unwrap()),
            blank_as_continuation: None,
            preserve_leading: None,
            force_header: None,
        }
    }

    fn table(rows: &[&[&str]], header_rows: Option<usize>) -> Option<TableData> {
        let raw: Vec<Vec<String>> = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        let options = NormalizeOptions {
            header: HeaderPolicy {
                fixed_rows: header_rows,
                ..HeaderPolicy::default()
            },
            ..NormalizeOptions::default()
        };
        normalize(&raw, &options)
    }

    #[test]
    fn empty_source_has_no_rows() {
        let data = AnalyzeGridBindData::new(None, &parameters(None));
        assert!(data.infos.is_empty());
    }

    #[test]
    fn describes_two_level_header() {
        let table = table(
            &[
                &["Model", "Size", ""],
                &["", "Width", "Height"],
                &["A", "1", "2"],
                &["", "3", "4"],
            ],
            Some(2),
        );
        let data = AnalyzeGridBindData::new(table, &parameters(None));
        assert_eq!(
            data.infos,
            vec![
                ColumnInfo {
                    index: 1,
                    name: "Model".to_owned(),
                    header_path: "Model".to_owned(),
                    merged: true,
                },
                ColumnInfo {
                    index: 2,
                    name: "Size — Width".to_owned(),
                    header_path: "Size / Width".to_owned(),
                    merged: false,
                },
                ColumnInfo {
                    index: 3,
                    name: "Size — Height".to_owned(),
                    header_path: "Size / Height".to_owned(),
                    merged: false,
                },
            ]
        );
    }

    #[test]
    fn merged_follows_merge_columns() {
        let rows: &[&[&str]] = &[&["Model", "Variant"], &["A", "x"], &["", ""]];
        let data = AnalyzeGridBindData::new(table(rows, None), &parameters(Some("A:B")));
        let merged: Vec<bool> = data.infos.iter().map(|info| info.merged).collect();
        assert_eq!(merged, vec![true, true]);

        let data = AnalyzeGridBindData::new(table(rows, None), &parameters(Some("B")));
        let merged: Vec<bool> = data.infos.iter().map(|info| info.merged).collect();
        assert_eq!(merged, vec![false, true]);
    }
}
