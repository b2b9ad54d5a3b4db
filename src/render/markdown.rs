//! GitHub-flavored markdown renderer.
//!
//! Each class renders as a preamble (heading, import line, description, enum
//! table) followed by `***`-separated `## Class Variables`, `## Fields` and
//! `## Functions` sections. The inheritance merger parses this same layout
//! back, so the section builders here are shared with it.

use crate::metadata::MetadataSpec;
use crate::model::*;
use crate::render::{Output, RenderContext, Renderer};
use crate::{sort, Result};

pub struct MarkdownRenderer;

pub const CLASS_VARIABLES: &str = "Class Variables";
pub const FIELDS: &str = "Fields";
pub const FUNCTIONS: &str = "Functions";

/// Separator between level-2 sections.
pub const RULE: &str = "***";

pub const CLASS_VARIABLE_TABLE: &str =
    "| Variable | Type | Value | Description |\n| --- | --- | --- | --- |";
const ENUM_TABLE: &str = "| Name | Value | Description |\n| --- | --- | --- |";
const PARAMETER_TABLE: &str =
    "| Parameter | Type | Default | Description |\n| --- | --- | --- | --- |";

impl Renderer for MarkdownRenderer {
    fn render(&self, classes: &[ClassBlock], ctx: &RenderContext) -> Result<Output> {
        let (text, warnings) = render_classes(classes, ctx.metadata, ctx.import_path.as_deref());
        Ok(Output { text, warnings })
    }

    fn file_extension(&self) -> &str {
        "md"
    }
}

/// Render every class of a file, in file order.
pub fn render_classes(
    classes: &[ClassBlock],
    metadata: Option<&MetadataSpec>,
    import_path: Option<&str>,
) -> (String, Vec<Warning>) {
    let mut docs = Vec::with_capacity(classes.len());
    let mut warnings = Vec::new();
    for class in classes {
        let (doc, class_warnings) = sort::apply(class, metadata, import_path);
        docs.push(doc.text);
        warnings.extend(class_warnings);
    }
    (join_classes(&docs), warnings)
}

/// Join per-class documents into one file's text.
pub fn join_classes(docs: &[String]) -> String {
    let mut text = docs
        .iter()
        .map(|d| d.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    text.push('\n');
    text
}

/// Heading, optional import line, description and enum table.
pub fn render_preamble(class: &ClassBlock, import_path: Option<&str>) -> String {
    let mut parts = vec![format!("# {}", class.name)];
    if let Some(path) = import_path {
        parts.push(format!("`from {} import {}`", path, class.name));
    }
    if !class.description.is_empty() {
        parts.push(escape_text(&class.description));
    }
    if !class.enum_values.is_empty() {
        parts.push(render_enum_values(&class.enum_values));
    }
    parts.join("\n\n")
}

/// Preamble plus `***`-separated sections, newline-terminated.
pub fn join_sections(preamble: &str, sections: &[String]) -> String {
    let mut text = preamble.trim_end().to_string();
    for section in sections {
        text.push_str("\n\n");
        text.push_str(RULE);
        text.push_str("\n\n");
        text.push_str(section.trim_end());
    }
    text.push('\n');
    text
}

// -- Tables and lists ---------------------------------------------------------

fn render_enum_values(values: &[EnumValue]) -> String {
    let mut table = ENUM_TABLE.to_string();
    for value in values {
        table.push_str(&format!(
            "\n| `{}` | `{}` | {} |",
            value.name,
            cell(&value.literal_value),
            cell(&value.description)
        ));
    }
    table
}

pub fn class_variable_row(variable: &ClassVariable) -> String {
    format!(
        "| `{}` | {} | {} | {} |",
        variable.name,
        cell(variable.declared_type.as_deref().unwrap_or("")),
        cell(variable.literal_value.as_deref().unwrap_or("")),
        cell(&variable.description)
    )
}

/// `## Class Variables` section from table rows.
pub fn class_variables_section(rows: &[String]) -> String {
    format!("## {}\n\n{}\n{}", CLASS_VARIABLES, CLASS_VARIABLE_TABLE, rows.join("\n"))
}

pub fn render_class_variables(variables: &[ClassVariable]) -> Option<String> {
    if variables.is_empty() {
        return None;
    }
    let rows: Vec<String> = variables.iter().map(class_variable_row).collect();
    Some(class_variables_section(&rows))
}

/// One field bullet; continuation lines are indented under the bullet.
pub fn field_item(field: &Field) -> String {
    let mut item = format!("- `{}`", field.name);
    let mut lines = field.description.lines();
    if let Some(first) = lines.next() {
        item.push_str(" — ");
        item.push_str(first);
    }
    for line in lines {
        item.push('\n');
        if !line.is_empty() {
            item.push_str("  ");
            item.push_str(line);
        }
    }
    item
}

/// `## Fields` section from rendered bullets.
pub fn fields_section(items: &[String]) -> String {
    format!("## {}\n\n{}", FIELDS, items.join("\n"))
}

pub fn render_fields(fields: &[Field]) -> Option<String> {
    if fields.is_empty() {
        return None;
    }
    let items: Vec<String> = fields.iter().map(field_item).collect();
    Some(fields_section(&items))
}

/// `## Functions` section around already-arranged function blocks.
pub fn functions_section(body: &str) -> String {
    format!("## {}\n\n{}", FUNCTIONS, body.trim_end())
}

// -- Functions ----------------------------------------------------------------

/// Render one function: heading, call signatures, body, parameter table and
/// return line.
pub fn render_function(func: &FunctionDoc) -> String {
    let mut parts = vec![format!("#### {}", escape_heading(&func.name))];

    for signature in &func.definition_signatures {
        parts.push(format!("**`{}`**", signature));
    }

    if !func.body_description.is_empty() {
        parts.push(escape_text(&func.body_description));
    }

    if !func.parameters.is_empty() {
        let mut table = PARAMETER_TABLE.to_string();
        for param in &func.parameters {
            table.push_str(&format!(
                "\n| `{}` | {} | {} | {} |",
                param.name,
                cell(&param.declared_type),
                cell(param.default_value.as_deref().unwrap_or("")),
                cell(&param.description)
            ));
        }
        parts.push(table);
    }

    if let Some(ref returns) = func.return_description {
        parts.push(format!("_Returns:_ {}", escape_text(returns)));
    }

    parts.join("\n\n")
}

/// Module-level variable table.
pub fn render_module_variables(variables: &[ModuleVariable]) -> String {
    if variables.is_empty() {
        return String::new();
    }
    let mut table = CLASS_VARIABLE_TABLE.to_string();
    for var in variables {
        table.push_str(&format!(
            "\n| `{}` | {} | {} | {} |",
            var.name,
            cell(&var.declared_type),
            cell(&var.value),
            cell(&var.description)
        ));
    }
    table.push('\n');
    table
}

/// Escape underscores so dunder names are not read as emphasis.
pub fn escape_heading(name: &str) -> String {
    name.replace('_', "\\_")
}

/// Escape column-0 `#` runs in free text so doc prose never reads as a
/// heading. Lines inside code fences are left alone.
pub fn escape_text(text: &str) -> String {
    let mut fence: Option<&str> = None;
    let mut out: Vec<String> = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
            out.push(line.to_string());
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
        } else if trimmed.starts_with("~~~") {
            fence = Some("~~~");
        }
        if fence.is_none() && line.starts_with('#') {
            out.push(format!("\\{line}"));
        } else {
            out.push(line.to_string());
        }
    }
    out.join("\n")
}

/// Make text safe for a single table cell.
fn cell(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize() -> FunctionDoc {
        FunctionDoc {
            name: "resize".to_string(),
            is_static: false,
            parameters: vec![
                Parameter {
                    name: "w".to_string(),
                    declared_type: "int".to_string(),
                    default_value: None,
                    description: "The width.".to_string(),
                },
                Parameter {
                    name: "h".to_string(),
                    declared_type: "int | None".to_string(),
                    default_value: Some("10".to_string()),
                    description: "The height.".to_string(),
                },
            ],
            return_description: None,
            body_description: "Resize the widget.".to_string(),
            definition_signatures: vec![
                "self.resize(w)".to_string(),
                "self.resize(w, h=10)".to_string(),
            ],
        }
    }

    #[test]
    fn function_block() {
        assert_eq!(
            render_function(&resize()),
            "#### resize\n\n\
             **`self.resize(w)`**\n\n\
             **`self.resize(w, h=10)`**\n\n\
             Resize the widget.\n\n\
             | Parameter | Type | Default | Description |\n\
             | --- | --- | --- | --- |\n\
             | `w` | int |  | The width. |\n\
             | `h` | int \\| None | 10 | The height. |"
        );
    }

    #[test]
    fn return_line() {
        let func = FunctionDoc {
            name: "get_size".to_string(),
            return_description: Some("The size.".to_string()),
            definition_signatures: vec!["self.get_size()".to_string()],
            ..Default::default()
        };
        assert_eq!(
            render_function(&func),
            "#### get\\_size\n\n**`self.get_size()`**\n\n_Returns:_ The size."
        );
    }

    #[test]
    fn prose_hashes_escaped_outside_fences() {
        let body = "Intro.\n\n# Example\n\n```python\n# a comment\n```\n#hashtag\n  # indented";
        assert_eq!(
            escape_text(body),
            "Intro.\n\n\\# Example\n\n```python\n# a comment\n```\n\\#hashtag\n  # indented"
        );
    }

    #[test]
    fn field_bullets() {
        let field = Field {
            name: "id".to_string(),
            description: "unique id".to_string(),
        };
        assert_eq!(field_item(&field), "- `id` — unique id");

        let multi = Field {
            name: "data".to_string(),
            description: "First.\n\nSecond.".to_string(),
        };
        assert_eq!(field_item(&multi), "- `data` — First.\n\n  Second.");
    }

    #[test]
    fn class_variable_table() {
        let vars = vec![ClassVariable {
            name: "LIMIT".to_string(),
            declared_type: Some("int".to_string()),
            literal_value: Some("10".to_string()),
            description: "Hard cap.".to_string(),
        }];
        assert_eq!(
            render_class_variables(&vars).unwrap(),
            "## Class Variables\n\n\
             | Variable | Type | Value | Description |\n\
             | --- | --- | --- | --- |\n\
             | `LIMIT` | int | 10 | Hard cap. |"
        );
    }

    #[test]
    fn preamble_with_enum_and_import() {
        let class = ClassBlock {
            name: "Color".to_string(),
            bases: Some("Enum".to_string()),
            description: "Colors.".to_string(),
            enum_values: vec![EnumValue {
                name: "red".to_string(),
                literal_value: "1".to_string(),
                description: "Warm.".to_string(),
            }],
            ..Default::default()
        };
        assert_eq!(
            render_preamble(&class, Some("pkg.color")),
            "# Color\n\n`from pkg.color import Color`\n\nColors.\n\n\
             | Name | Value | Description |\n| --- | --- | --- |\n| `red` | `1` | Warm. |"
        );
    }

    #[test]
    fn sections_joined_with_rules() {
        let text = join_sections("# A", &["## Fields\n\n- `x`".to_string()]);
        assert_eq!(text, "# A\n\n***\n\n## Fields\n\n- `x`\n");
    }

    #[test]
    fn module_variable_table() {
        let vars = vec![ModuleVariable {
            name: "RETRIES".to_string(),
            declared_type: "int".to_string(),
            value: "3".to_string(),
            description: "Max retries.".to_string(),
        }];
        assert!(render_module_variables(&vars).ends_with("| `RETRIES` | int | 3 | Max retries. |\n"));
        assert_eq!(render_module_variables(&[]), "");
    }
}
