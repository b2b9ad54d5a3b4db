//! JSON renderer — structured output for tooling integration.
//!
//! Serializes the assembled class records directly. Metadata ordering does
//! not apply; functions stay in source order.

use crate::error::Result;
use crate::model::ClassBlock;
use crate::render::{Output, RenderContext, Renderer};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonDoc<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    import_path: Option<&'a str>,
    classes: &'a [ClassBlock],
}

impl Renderer for JsonRenderer {
    fn render(&self, classes: &[ClassBlock], ctx: &RenderContext) -> Result<Output> {
        let doc = JsonDoc {
            import_path: ctx.import_path.as_deref(),
            classes,
        };
        let mut text = serde_json::to_string_pretty(&doc)?;
        text.push('\n');
        Ok(Output {
            text,
            warnings: Vec::new(),
        })
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
