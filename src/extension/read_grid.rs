//! # Read Grid Table Function
//!
//! `read_grid` normalizes a CSV export with multi-row headers and merged cells
//! and exposes the body rows to SQL, one VARCHAR column per flat header label.
use crate::database::column::Column;
use crate::database::column::ColumnType;
use crate::database::range::ColumnList;
use crate::error::ResultMessage;
use crate::error::RustyTableError;
use crate::extension::load_table;
use crate::extension::writer::write_to_vector;
use crate::extension::writer::Value;
use crate::extension::BandColumnParam;
use crate::extension::FileParam;
use crate::extension::GridParameters;
use crate::extension::NamedParam;
use crate::extension::Param;
use crate::grid::TableData;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use log::debug;
use std::error::Error;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

/// Rows handed to DuckDB per output chunk.
const STEP: usize = 2048;

/// Parameters for the read_grid table function.
struct ReadGridParameters {
    /// Shared source and merge parameters
    grid: GridParameters,
    /// Optional name of the BIGINT band column
    band_column: Option<String>,
}

impl TryFrom<&BindInfo> for ReadGridParameters {
    type Error = RustyTableError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(ReadGridParameters {
            grid: GridParameters::try_from(bind)?,
            band_column: BandColumnParam::read(bind)?,
        })
    }
}

/// Bind data for the read_grid table function.
#[repr(C)]
pub(crate) struct ReadGridBindData {
    /// Output columns; the band column, when requested, comes last
    columns: Vec<Column>,
    /// Body rows, each as wide as the flat header
    rows: Vec<Vec<String>>,
    /// Band index per body row when a band column was requested
    bands: Option<Vec<usize>>,
}

impl ReadGridBindData {
    fn new(table: Option<TableData>, parameters: &ReadGridParameters) -> Self {
        let (mut names, rows, bands) = match table {
            Some(table) => {
                let bands = parameters.band_column.as_ref().map(|_| {
                    let cells = table.cell_spans(&parameters.grid.merge_config());
                    table.bands(&cells, parameters.grid.primary_column())
                });
                (table.headers_flat, table.rows, bands)
            }
            None => (vec!["Col1".to_owned()], vec![], parameters.band_column.as_ref().map(|_| vec![])),
        };
        if let Some(band_column) = &parameters.band_column {
            names.push(band_column.to_owned());
        }
        let mut columns = Column::from_headers(&names);
        if bands.is_some() {
            if let Some(column) = columns.last_mut() {
                column.kind = ColumnType::BigInt;
            }
        }
        ReadGridBindData { columns, rows, bands }
    }
}

impl TryFrom<&ReadGridParameters> for ReadGridBindData {
    type Error = RustyTableError;

    fn try_from(parameters: &ReadGridParameters) -> Result<Self, Self::Error> {
        let options = parameters.grid.normalize_options(None, None);
        let table = load_table(&parameters.grid.file_name, &options)?;
        Ok(ReadGridBindData::new(table, parameters))
    }
}

#[repr(C)]
/// Initialization data: the chunk cursor and the projected columns.
pub(crate) struct ReadGridInitData {
    /// Index of the next chunk to hand out
    index: AtomicUsize,
    /// Column indices that should be projected
    projections: Vec<usize>,
}

/// Table function reading a normalized grid.
pub(crate) struct ReadGridTableFunction;

impl VTab for ReadGridTableFunction {
    type InitData = ReadGridInitData;
    type BindData = ReadGridBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = ReadGridParameters::try_from(bind)?;
        let data = ReadGridBindData::try_from(&parameters).with_prefix(parameters.grid.file_name.as_str())?;
        debug!(
            "read_grid '{}': {} column(s), {} row(s), merge columns [{}]",
            parameters.grid.file_name,
            data.columns.len(),
            data.rows.len(),
            ColumnList(parameters.grid.merge_config().merge_columns),
        );
        for column in &data.columns {
            bind.add_result_column(column.name.as_str(), LogicalTypeHandle::from(column.kind.to_logical_type_id()));
        }
        Ok(data)
    }

    fn init(init: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        let projections = init.get_column_indices()
            .into_iter()
            .map(|index| index as usize)
            .collect::<Vec<_>>();
        Ok(ReadGridInitData {
            index: AtomicUsize::new(0),
            projections,
        })
    }

    /// Produces the next chunk of up to 2048 body rows.
    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let bind = func.get_bind_data();
        let init = func.get_init_data();
        let lower = init.index.fetch_add(1, Ordering::Relaxed).saturating_mul(STEP);
        if lower >= bind.rows.len() {
            output.set_len(0);
            return Ok(());
        }

        let upper = (lower + STEP).min(bind.rows.len());
        output.set_len(upper - lower);
        let mut vectors: Vec<_> = (0..init.projections.len()).map(|index| output.flat_vector(index)).collect();
        for (row, record) in bind.rows[lower..upper].iter().enumerate() {
            for (index, col) in init.projections.iter().enumerate() {
                let vector = &mut vectors[index];
                let column = &bind.columns[*col];
                if let Some(text) = record.get(*col) {
                    write_to_vector(column, Value::Text(text), vector, row)?;
                } else if let Some(band) = bind.bands.as_ref().and_then(|bands| bands.get(lower + row)) {
                    write_to_vector(column, Value::Integer(*band as i64), vector, row)?;
                } else {
                    vector.set_null(row);
                }
            }
        }
        Ok(())
    }

    fn supports_pushdown() -> bool {
        true
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            FileParam::kind(),
        ])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        let mut definitions = GridParameters::definitions();
        definitions.push(BandColumnParam::definition());
        Some(definitions)
    }
}
