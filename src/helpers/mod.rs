//! Source acquisition: reading local or remote files and turning their bytes into a raw grid.
pub mod reader;
pub mod text;
