//! # Extension Core Module
//!
//! Named parameter handling shared by the table functions, and the common
//! workflow of loading a source file and normalizing it into a table.
use crate::database::range::ColumnList;
use crate::error::RustyTableError;
use crate::extension::ExtensionError::InvalidParameter;
use crate::grid::header::HeaderPolicy;
use crate::grid::normalize;
use crate::grid::render::Align;
use crate::grid::span::MergeConfig;
use crate::grid::NormalizeOptions;
use crate::grid::TableData;
use crate::helpers::reader::read_source;
use crate::helpers::text::read_grid;
use duckdb::core::LogicalTypeHandle;
use duckdb::core::LogicalTypeId;
use duckdb::vtab::BindInfo;
use log::debug;
use thiserror::Error;

pub(crate) mod analyze_grid;
pub(crate) mod read_grid;
pub(crate) mod render_grid;
pub(crate) mod writer;

/// Custom error types for the extension operations.
#[derive(Error, Debug)]
pub enum ExtensionError {
    /// Invalid parameter provided to a table function
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },
}

/// Positional parameter of a table function.
pub(crate) trait Param<T> {
    /// Returns the DuckDB logical type for this parameter
    fn kind() -> LogicalTypeHandle;

    /// Extracts the parameter value at `index`
    fn read(bind: &BindInfo, index: u64) -> Result<T, RustyTableError>;
}

/// Named parameter of a table function.
pub(crate) trait NamedParam<T> {
    /// Returns the parameter name as used in SQL
    fn name() -> &'static str;

    /// Returns the DuckDB logical type for this parameter
    fn kind() -> LogicalTypeHandle;

    /// Returns the complete parameter definition (name and type)
    fn definition() -> (String, LogicalTypeHandle) {
        (Self::name().to_string(), Self::kind())
    }

    /// Extracts the parameter value; `None` if the parameter was not given
    fn read(bind: &BindInfo) -> Result<Option<T>, RustyTableError>;
}

/// Reads a named parameter in its VARCHAR rendering.
fn read_text(bind: &BindInfo, name: &str) -> Option<String> {
    bind.get_named_parameter(name).map(|value| value.to_string())
}

fn invalid(name: &str, message: String) -> RustyTableError {
    InvalidParameter {
        name: name.to_owned(),
        message,
    }
    .into()
}

fn parse_bool(name: &str, text: &str) -> Result<bool, RustyTableError> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "1" => Ok(true),
        "false" | "f" | "0" => Ok(false),
        _ => Err(invalid(name, format!("'{text}' is not a boolean"))),
    }
}

/// Source file path or URL
pub(crate) struct FileParam;

/// Fixed number of header rows, overriding detection
pub(crate) struct HeaderRowsParam;

/// Columns whose repeated values merge vertically
pub(crate) struct MergeColumnsParam;

/// Whether blank cells continue the value above them
pub(crate) struct BlankAsContinuationParam;

/// Whether leading empty rows and columns are kept
pub(crate) struct PreserveLeadingParam;

/// Whether a first row that does not look like a header is still taken as one
pub(crate) struct ForceHeaderParam;

/// Name of an extra column carrying each row's band index
pub(crate) struct BandColumnParam;

/// Table title for rendering
pub(crate) struct TitleParam;

/// Table caption for rendering
pub(crate) struct CaptionParam;

/// Per-column alignment hints for rendering
pub(crate) struct ColumnAlignParam;

impl Param<String> for FileParam {
    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo, index: u64) -> Result<String, RustyTableError> {
        Ok(bind.get_parameter(index).to_string())
    }
}

impl NamedParam<usize> for HeaderRowsParam {
    fn name() -> &'static str {
        "header_rows"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::UInteger)
    }

    fn read(bind: &BindInfo) -> Result<Option<usize>, RustyTableError> {
        read_text(bind, Self::name())
            .map(|text| {
                text.trim()
                    .parse::<usize>()
                    .map_err(|e| invalid(Self::name(), e.to_string()))
            })
            .transpose()
    }
}

impl NamedParam<ColumnList> for MergeColumnsParam {
    fn name() -> &'static str {
        "merge_columns"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<ColumnList>, RustyTableError> {
        read_text(bind, Self::name())
            .map(|text| ColumnList::try_from(text.as_str()))
            .transpose()
    }
}

impl NamedParam<bool> for BlankAsContinuationParam {
    fn name() -> &'static str {
        "blank_as_continuation"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Boolean)
    }

    fn read(bind: &BindInfo) -> Result<Option<bool>, RustyTableError> {
        read_text(bind, Self::name())
            .map(|text| parse_bool(Self::name(), &text))
            .transpose()
    }
}

impl NamedParam<bool> for PreserveLeadingParam {
    fn name() -> &'static str {
        "preserve_leading"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Boolean)
    }

    fn read(bind: &BindInfo) -> Result<Option<bool>, RustyTableError> {
        read_text(bind, Self::name())
            .map(|text| parse_bool(Self::name(), &text))
            .transpose()
    }
}

impl NamedParam<bool> for ForceHeaderParam {
    fn name() -> &'static str {
        "force_header"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Boolean)
    }

    fn read(bind: &BindInfo) -> Result<Option<bool>, RustyTableError> {
        read_text(bind, Self::name())
            .map(|text| parse_bool(Self::name(), &text))
            .transpose()
    }
}

impl NamedParam<String> for BandColumnParam {
    fn name() -> &'static str {
        "band_column"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<String>, RustyTableError> {
        Ok(read_text(bind, Self::name()))
    }
}

impl NamedParam<String> for TitleParam {
    fn name() -> &'static str {
        "title"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<String>, RustyTableError> {
        Ok(read_text(bind, Self::name()))
    }
}

impl NamedParam<String> for CaptionParam {
    fn name() -> &'static str {
        "caption"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<String>, RustyTableError> {
        Ok(read_text(bind, Self::name()))
    }
}

/// Parses a comma separated list of alignment hints such as "l,c,r".
/// An empty item leaves that column without a hint (rendered left).
pub(crate) fn parse_column_align(text: &str) -> Result<Vec<Align>, RustyTableError> {
    text.split(',')
        .map(|item| {
            if item.trim().is_empty() {
                Ok(Align::default())
            } else {
                Align::parse(item).ok_or_else(|| {
                    invalid(ColumnAlignParam::name(), format!("'{}' is not an alignment", item.trim()))
                })
            }
        })
        .collect()
}

impl NamedParam<Vec<Align>> for ColumnAlignParam {
    fn name() -> &'static str {
        "column_align"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Varchar)
    }

    fn read(bind: &BindInfo) -> Result<Option<Vec<Align>>, RustyTableError> {
        read_text(bind, Self::name())
            .map(|text| parse_column_align(&text))
            .transpose()
    }
}

/// Parameters shared by every table function.
pub(crate) struct GridParameters {
    /// Path or URL of the CSV source
    pub(crate) file_name: String,
    /// Fixed header row count (default: detected)
    pub(crate) header_rows: Option<usize>,
    /// Merge columns (default: first column)
    pub(crate) merge_columns: Option<ColumnList>,
    /// Blank-as-continuation policy (default: true)
    pub(crate) blank_as_continuation: Option<bool>,
    /// Keep leading empty rows and columns (default: false)
    pub(crate) preserve_leading: Option<bool>,
    /// Force a first header row (default: true)
    pub(crate) force_header: Option<bool>,
}

impl TryFrom<&BindInfo> for GridParameters {
    type Error = RustyTableError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(GridParameters {
            file_name: FileParam::read(bind, 0)?,
            header_rows: HeaderRowsParam::read(bind)?,
            merge_columns: MergeColumnsParam::read(bind)?,
            blank_as_continuation: BlankAsContinuationParam::read(bind)?,
            preserve_leading: PreserveLeadingParam::read(bind)?,
            force_header: ForceHeaderParam::read(bind)?,
        })
    }
}

impl GridParameters {
    /// Named parameters understood by every table function.
    pub(crate) fn definitions() -> Vec<(String, LogicalTypeHandle)> {
        vec![
            HeaderRowsParam::definition(),
            MergeColumnsParam::definition(),
            BlankAsContinuationParam::definition(),
            PreserveLeadingParam::definition(),
            ForceHeaderParam::definition(),
        ]
    }

    /// Merge policy with defaults applied.
    pub(crate) fn merge_config(&self) -> MergeConfig {
        let defaults = MergeConfig::default();
        MergeConfig {
            merge_columns: self
                .merge_columns
                .as_ref()
                .map(|columns| columns.0.to_owned())
                .unwrap_or(defaults.merge_columns),
            blank_as_continuation: self
                .blank_as_continuation
                .unwrap_or(defaults.blank_as_continuation),
            preserve_leading: self.preserve_leading.unwrap_or(defaults.preserve_leading),
        }
    }

    /// Column whose merge groups drive row banding: the first merge column.
    pub(crate) fn primary_column(&self) -> usize {
        self.merge_config().merge_columns.first().copied().unwrap_or(0)
    }

    /// Normalization options with defaults applied.
    pub(crate) fn normalize_options(&self, title: Option<String>, caption: Option<String>) -> NormalizeOptions {
        let defaults = HeaderPolicy::default();
        NormalizeOptions {
            header: HeaderPolicy {
                fixed_rows: self.header_rows,
                force_first: self.force_header.unwrap_or(defaults.force_first),
                ..defaults
            },
            preserve_leading: self.preserve_leading.unwrap_or(false),
            title,
            caption,
        }
    }
}

/// Reads, decodes, parses and normalizes a source.
///
/// `Ok(None)` means the source holds no data, which is not an error.
pub(crate) fn load_table(file_name: &str, options: &NormalizeOptions) -> Result<Option<TableData>, RustyTableError> {
    let bytes = read_source(file_name)?;
    let raw = read_grid(&bytes)?;
    debug!("read {} raw row(s) from '{}'", raw.len(), file_name);
    Ok(normalize(&raw, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_forms() {
        assert!(parse_bool("x", "TRUE").unwrap());
        assert!(!parse_bool("x", "false").unwrap());
        let message = parse_bool("preserve_leading", "maybe").unwrap_err().to_string();
        assert_eq!(message, "Invalid parameter 'preserve_leading': 'maybe' is not a boolean");
    }

    #[test]
    fn parse_column_align_forms() {
        assert_eq!(
            parse_column_align("l, c,,right").unwrap(),
            vec![Align::Left, Align::Center, Align::Left, Align::Right]
        );
        assert!(parse_column_align("l,up").is_err());
    }

    #[test]
    fn merge_config_defaults() {
        let parameters = GridParameters {
            file_name: String::new(),
            header_rows: None,
            merge_columns: None,
            blank_as_continuation: None,
            preserve_leading: None,
            force_header: None,
        };
        assert_eq!(parameters.merge_config(), MergeConfig::default());
        assert_eq!(parameters.normalize_options(None, None), NormalizeOptions::default());
    }

    #[test]
    fn merge_config_overrides() {
        let parameters = GridParameters {
            file_name: String::new(),
            header_rows: Some(2),
            merge_columns: Some(ColumnList::try_from("B:C").unwrap()),
            blank_as_continuation: Some(false),
            preserve_leading: Some(true),
            force_header: Some(false),
        };
        let config = parameters.merge_config();
        assert_eq!(config.merge_columns.into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(parameters.primary_column(), 1);
        assert!(!config.blank_as_continuation);
        let options = parameters.normalize_options(Some("T".to_owned()), None);
        assert_eq!(options.header.fixed_rows, Some(2));
        assert!(!options.header.force_first);
        assert!(options.preserve_leading);
    }

    #[test]
    fn load_table_missing_file() {
        let options = NormalizeOptions::default();
        assert!(load_table("no_such_table.csv", &options).is_err());
    }
}
