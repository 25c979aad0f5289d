//! # DuckDB Grid Table Extension
//!
//! A DuckDB extension that reads CSV exports of presentation-style tables
//! (multi-row headers, merged cells collapsed to blanks, stray encoding
//! artefacts) and turns them into clean relational rows, an HTML rendering with
//! reconstructed `rowspan`/`colspan` merges, or a flat CSV export.
//!
//! ## Features
//!
//! - **Cell sanitizing**: Mojibake repair and removal of invisible characters
//! - **Header detection**: Heuristic detection of multi-row header regions
//! - **Header flattening**: Left-filled header rows joined into one label per column
//! - **Merge inference**: Vertical merges on chosen columns and horizontal merges
//!   under grouped headers
//! - **Row banding**: Alternating shading keyed on merged groups
//! - **Remote sources**: Any URL DuckDB can read with `read_blob`
//!
//! ## Table Functions
//!
//! - `read_grid`: Query the normalized rows of a source
//! - `analyze_grid`: Describe the columns `read_grid` produces
//! - `render_grid`: Render a source to HTML and flat CSV
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

mod database;
mod error;
mod extension;
pub mod grid;
mod helpers;

use crate::extension::analyze_grid::AnalyzeGridTableFunction;
use crate::extension::read_grid::ReadGridTableFunction;
use crate::extension::render_grid::RenderGridTableFunction;
use anyhow::Context;
use anyhow::Result;
use duckdb::Connection;
use duckdb_loadable_macros::duckdb_entrypoint_c_api;
use libduckdb_sys as ffi;

/// Extension entry point for DuckDB.
///
/// Registers `read_grid`, `analyze_grid` and `render_grid`.
///
/// # Errors
///
/// Returns an error if a table function fails to register with DuckDB.
#[duckdb_entrypoint_c_api()]
pub unsafe fn extension_entrypoint(connection: Connection) -> Result<()> {
    connection
        .register_table_function::<ReadGridTableFunction>("read_grid")
        .context("Failed to register read_grid table function")?;
    connection
        .register_table_function::<AnalyzeGridTableFunction>("analyze_grid")
        .context("Failed to register analyze_grid table function")?;
    connection
        .register_table_function::<RenderGridTableFunction>("render_grid")
        .context("Failed to register render_grid table function")?;
    Ok(())
}
