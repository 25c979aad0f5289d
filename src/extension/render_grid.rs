//! # Render Grid Table Function
//!
//! `render_grid` returns a single row holding the HTML rendering of a normalized
//! grid with its merged cells and row bands, next to a flat CSV export.
use crate::database::column::Column;
use crate::database::column::ColumnType;
use crate::error::ResultMessage;
use crate::error::RustyTableError;
use crate::extension::load_table;
use crate::extension::writer::write_to_vector;
use crate::extension::writer::Value;
use crate::extension::CaptionParam;
use crate::extension::ColumnAlignParam;
use crate::extension::FileParam;
use crate::extension::GridParameters;
use crate::extension::NamedParam;
use crate::extension::Param;
use crate::extension::TitleParam;
use crate::grid::render::render_html;
use crate::grid::render::Align;
use crate::grid::render::RenderOptions;
use crate::grid::TableData;
use duckdb::core::DataChunkHandle;
use duckdb::core::LogicalTypeHandle;
use duckdb::vtab::BindInfo;
use duckdb::vtab::InitInfo;
use duckdb::vtab::TableFunctionInfo;
use duckdb::vtab::VTab;
use std::error::Error;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

/// Parameters for the render_grid table function.
struct RenderGridParameters {
    grid: GridParameters,
    title: Option<String>,
    caption: Option<String>,
    /// Alignment hints, one per column (default: none)
    column_align: Option<Vec<Align>>,
}

impl TryFrom<&BindInfo> for RenderGridParameters {
    type Error = RustyTableError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(RenderGridParameters {
            grid: GridParameters::try_from(bind)?,
            title: TitleParam::read(bind)?,
            caption: CaptionParam::read(bind)?,
            column_align: ColumnAlignParam::read(bind)?,
        })
    }
}

/// Bind data: the single result row.
#[repr(C)]
pub(crate) struct RenderGridBindData {
    html: String,
    csv: String,
    header_rows: i64,
    data_rows: i64,
}

impl RenderGridBindData {
    fn new(table: Option<TableData>, parameters: &RenderGridParameters) -> Self {
        let options = RenderOptions {
            merge: parameters.grid.merge_config(),
            column_align: parameters.column_align.to_owned().unwrap_or_default(),
            primary_column: parameters.grid.primary_column(),
        };
        RenderGridBindData {
            html: render_html(table.as_ref(), &options),
            csv: table.as_ref().map(TableData::to_csv).unwrap_or_default(),
            header_rows: table.as_ref().map(|table| table.header_rows.len() as i64).unwrap_or(0),
            data_rows: table.as_ref().map(|table| table.rows.len() as i64).unwrap_or(0),
        }
    }
}

impl TryFrom<&RenderGridParameters> for RenderGridBindData {
    type Error = RustyTableError;

    fn try_from(parameters: &RenderGridParameters) -> Result<Self, Self::Error> {
        let options = parameters
            .grid
            .normalize_options(parameters.title.to_owned(), parameters.caption.to_owned());
        let table = load_table(&parameters.grid.file_name, &options)?;
        Ok(RenderGridBindData::new(table, parameters))
    }
}

#[repr(C)]
pub(crate) struct RenderGridInitData {
    /// Whether the single row has been returned
    done: AtomicBool,
}

/// Table function rendering a normalized grid to HTML and CSV.
pub(crate) struct RenderGridTableFunction;

impl RenderGridTableFunction {
    fn columns() -> [Column; 4] {
        [
            Column::new("html", ColumnType::Varchar),
            Column::new("csv", ColumnType::Varchar),
            Column::new("header_rows", ColumnType::BigInt),
            Column::new("data_rows", ColumnType::BigInt),
        ]
    }
}

impl VTab for RenderGridTableFunction {
    type InitData = RenderGridInitData;
    type BindData = RenderGridBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = RenderGridParameters::try_from(bind)?;
        let data = RenderGridBindData::try_from(&parameters).with_prefix(parameters.grid.file_name.as_str())?;
        for column in Self::columns() {
            bind.add_result_column(column.name.as_str(), LogicalTypeHandle::from(column.kind.to_logical_type_id()));
        }
        Ok(data)
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(RenderGridInitData {
            done: AtomicBool::new(false),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init = func.get_init_data();
        let bind = func.get_bind_data();

        if init.done.swap(true, Ordering::Relaxed) {
            output.set_len(0);
            return Ok(());
        }

        output.set_len(1);
        let values = [
            Value::Text(bind.html.as_str()),
            Value::Text(bind.csv.as_str()),
            Value::Integer(bind.header_rows),
            Value::Integer(bind.data_rows),
        ];
        for (index, (column, value)) in Self::columns().iter().zip(values).enumerate() {
            let mut vector = output.flat_vector(index);
            write_to_vector(column, value, &mut vector, 0)?;
        }
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![
            FileParam::kind(),
        ])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        let mut definitions = GridParameters::definitions();
        definitions.extend([
            TitleParam::definition(),
            CaptionParam::definition(),
            ColumnAlignParam::definition(),
        ]);
        Some(definitions)
    }
}
