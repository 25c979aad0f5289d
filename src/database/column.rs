use duckdb::core::LogicalTypeId;

/// Types of the columns produced by the table functions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum ColumnType {
    /// Boolean values (true/false)
    Boolean,
    /// 64-bit signed integers
    BigInt,
    /// Variable-length strings
    Varchar,
}

/// A result column with name and data type.
#[derive(Clone, Debug)]
pub(crate) struct Column {
    /// Column name (from the flat header or fixed by the function)
    pub(crate) name: String,
    /// Column data type
    pub(crate) kind: ColumnType,
}

impl ColumnType {
    /// Converts column type to DuckDB's logical type ID.
    pub(crate) const fn to_logical_type_id(&self) -> LogicalTypeId {
        match self {
            Self::Boolean => LogicalTypeId::Boolean,
            Self::BigInt => LogicalTypeId::Bigint,
            Self::Varchar => LogicalTypeId::Varchar,
        }
    }
}

impl Column {
    pub(crate) fn new(name: &str, kind: ColumnType) -> Self {
        Column {
            name: name.to_owned(),
            kind,
        }
    }

    /// Builds VARCHAR columns from flat header labels.
    /// Repeated labels get a `_2`, `_3`, ... suffix so every column name is unique.
    pub(crate) fn from_headers(headers: &[String]) -> Vec<Column> {
        let mut columns: Vec<Column> = Vec::with_capacity(headers.len());
        for header in headers {
            let mut name = header.to_owned();
            let mut suffix = 1;
            while columns.iter().any(|column| column.name.eq_ignore_ascii_case(&name)) {
                suffix += 1;
                name = format!("{}_{}", header, suffix);
            }
            columns.push(Column::new(&name, ColumnType::Varchar));
        }
        columns
    }
}
