//! classdoc — markdown reference docs from doc-comment blocks in class-based
//! source files.
//!
//! Pipeline: [`parser`] scans a [`SourceText`] into [`ClassBlock`]s,
//! [`sort`] orders functions by an optional [`MetadataSpec`] and renders the
//! markdown, [`toc`] derives tables of contents, and [`merge`] folds a base
//! class document into its subclasses. Every stage is a pure function of its
//! input; diagnostics come back as [`Warning`] values.

pub mod error;
pub mod merge;
pub mod metadata;
pub mod model;
pub mod parser;
pub mod render;
pub mod sort;
pub mod toc;

pub use error::{Error, MetadataError, Result, ScanError};
pub use metadata::{MetadataSpec, Section};
pub use model::*;
pub use parser::ScanOptions;

use std::collections::BTreeSet;

/// Options shared by every document generated in one run.
#[derive(Debug, Clone, Default)]
pub struct DocOptions {
    /// Package path prepended to the module name in the import line.
    pub import_prefix: Option<String>,
    /// Classes the package `__init__` re-exports; these import from the
    /// package itself.
    pub reexports: BTreeSet<String>,
    pub strict: bool,
}

impl DocOptions {
    /// `pkg.module` for `src`, when an import prefix is set. A file whose
    /// first class is re-exported by the package imports from `pkg`.
    pub fn import_path(&self, src: &SourceText, classes: &[ClassBlock]) -> Option<String> {
        let prefix = self
            .import_prefix
            .as_deref()
            .map(|p| p.trim_end_matches('.'))
            .filter(|p| !p.is_empty())?;
        if classes.first().is_some_and(|c| self.reexports.contains(&c.name)) {
            return Some(prefix.to_string());
        }
        Some(format!("{}.{}", prefix, src.module_name()))
    }

    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            strict: self.strict,
        }
    }
}

/// Scan, sort and render one source file to markdown.
pub fn generate(
    src: &SourceText,
    spec: Option<&MetadataSpec>,
    options: &DocOptions,
) -> Result<(RenderedDoc, Vec<Warning>), ScanError> {
    let classes = parser::assemble(src, &options.scan_options())?;
    let import_path = options.import_path(src, &classes);
    let (text, warnings) = render::markdown::render_classes(&classes, spec, import_path.as_deref());
    Ok((RenderedDoc::new(text), warnings))
}
