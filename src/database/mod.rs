//! SQL-facing data model: result columns and column-list parameters.
pub(crate) mod column;
pub mod range;
