//! Parser module — line scanning and record assembly.

pub mod assemble;
pub mod scanner;
pub mod signature;

pub use assemble::{assemble, ScanOptions};

use crate::error::{Error, Result};
use crate::model::{ClassBlock, SourceText};
use std::path::Path;

/// File extensions recognized as documentable sources.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["py", "pyi"];

/// Read a source file from disk into lines.
pub fn read_source(path: &Path) -> Result<SourceText> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceText::new(path.to_string_lossy(), &content))
}

/// Read and scan a source file from disk.
pub fn parse_file(path: &Path, options: &ScanOptions) -> Result<(SourceText, Vec<ClassBlock>)> {
    let src = read_source(path)?;
    let classes = assemble(&src, options)?;
    Ok((src, classes))
}
