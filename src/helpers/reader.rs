use crate::error::RustyTableError;
use std::fs;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum UnifiedReaderError {
    #[error("No data from remote file: '{0}'")]
    RemoteFileNoDataError(String),
}

/// Reads the whole source into memory, from a local path, a `file://` URL or a
/// remote URL.
///
/// Remote URLs (http, https, s3, gs, hf, ...) go through DuckDB's `read_blob`, so
/// the credentials and secrets configured in DuckDB apply.
pub fn read_source(file_name: &str) -> Result<Vec<u8>, RustyTableError> {
    match Url::parse(file_name) {
        Ok(url) if is_remote(&url) => read_blob_with_duckdb(file_name),
        Ok(url) if url.scheme() == "file" => match url.to_file_path() {
            Ok(path) => Ok(fs::read(path)?),
            Err(_) => Ok(fs::read(file_name)?),
        },
        _ => Ok(fs::read(file_name)?),
    }
}

/// Single-letter schemes are Windows drive prefixes such as `C:\`.
fn is_remote(url: &Url) -> bool {
    url.scheme() != "file" && url.scheme().len() > 1
}

fn read_blob_with_duckdb(file_name: &str) -> Result<Vec<u8>, RustyTableError> {
    let connection = duckdb::Connection::open_in_memory()?;
    let result: Result<Vec<u8>, _> = connection.query_row("SELECT content FROM read_blob(?)", [file_name], |row| row.get(0));
    connection.close().map_err(|(_, e)| e)?;

    let bytes = result?;
    if bytes.is_empty() {
        Err(UnifiedReaderError::RemoteFileNoDataError(file_name.to_owned()))?;
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_remote_url(file_name: &str) -> bool {
        Url::parse(file_name).map(|url| is_remote(&url)).unwrap_or(false)
    }

    #[test]
    fn test_is_remote_url() {
        assert!(!is_remote_url("specs.csv"));
        assert!(!is_remote_url("/path/to/specs.csv"));
        assert!(!is_remote_url("C:\\data\\specs.csv"));
        assert!(!is_remote_url("file:///path/to/specs.csv"));

        assert!(is_remote_url("http://example.com/specs.csv"));
        assert!(is_remote_url("https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=0"));
        assert!(is_remote_url("s3://bucket/specs.csv"));
    }

    #[test]
    fn test_read_local_file() {
        // Cargo.toml always exists at the crate root
        let bytes = read_source("Cargo.toml").unwrap();
        assert!(bytes.starts_with(b"[package]"));
        assert!(read_source("non_existent_file.csv").is_err());
    }

    #[test]
    fn test_read_file_url() {
        let path = std::env::current_dir().unwrap().join("Cargo.toml");
        let url = Url::from_file_path(&path).unwrap();
        let bytes = read_source(url.as_str()).unwrap();
        assert!(bytes.starts_with(b"[package]"));
    }
}
