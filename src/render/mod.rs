//! Renderer module — trait-based format dispatch.

pub mod json;
pub mod markdown;

use crate::error::{Error, Result};
use crate::metadata::MetadataSpec;
use crate::model::{ClassBlock, Warning};

/// Per-file settings shared by every renderer.
#[derive(Debug, Clone, Default)]
pub struct RenderContext<'a> {
    pub metadata: Option<&'a MetadataSpec>,
    /// Dotted module path for the `from ... import` line.
    pub import_path: Option<String>,
}

/// Rendered text for one source file and the diagnostics raised on the way.
#[derive(Debug, Clone, Default)]
pub struct Output {
    pub text: String,
    pub warnings: Vec<Warning>,
}

/// Trait for rendering a file's class blocks into a specific output format.
pub trait Renderer {
    fn render(&self, classes: &[ClassBlock], ctx: &RenderContext) -> Result<Output>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::UnknownFormat(format.to_string())),
    }
}
