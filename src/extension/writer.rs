//! Data writing utilities for moving table values into DuckDB vectors.

use crate::database::column::Column;
use crate::database::column::ColumnType;
use crate::error::RustyTableError;
use duckdb::core::FlatVector;
use duckdb::core::Inserter;

/// A single output value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) enum Value<'a> {
    Text(&'a str),
    Integer(i64),
    Flag(bool),
}

/// Writes a value to a DuckDB vector based on column type.
pub(super) fn write_to_vector(column: &Column, value: Value, vector: &mut FlatVector, row: usize) -> Result<(), RustyTableError> {
    match (column.kind, value) {
        (ColumnType::Varchar, Value::Text(text)) => vector.insert(row, text),
        (ColumnType::BigInt, Value::Integer(number)) => write_primitive(vector, row, number),
        (ColumnType::Boolean, Value::Flag(flag)) => write_primitive(vector, row, flag),
        (kind, value) => {
            return Err(RustyTableError::WithContextError(format!(
                "column '{}' of type {:?} cannot hold {:?}",
                column.name, kind, value
            )))
        }
    }
    Ok(())
}

/// Writes a primitive value directly to a vector using pointer arithmetic.
fn write_primitive<T>(vector: &mut FlatVector, index: usize, value: T) {
    unsafe {
        let pointer: *mut T = vector.as_mut_ptr();
        std::ptr::write(pointer.add(index), value);
    }
}
