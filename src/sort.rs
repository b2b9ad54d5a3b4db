//! Metadata-driven ordering of function blocks.
//!
//! Classes without a metadata entry keep source order. Classes with one are
//! regrouped into the entry's sections; every public function must then be
//! listed somewhere or it is left out with a warning.

use crate::metadata::MetadataSpec;
use crate::model::{ClassBlock, RenderedDoc, Warning};
use crate::render::markdown;
use std::collections::{HashMap, HashSet};

/// A rendered function block keyed by its unescaped function name.
pub type FunctionBlock = (String, String);

/// Order rendered function blocks for `class_name` and join them into the
/// body of the `## Functions` section.
pub fn arrange(
    class_name: &str,
    blocks: &[FunctionBlock],
    spec: Option<&MetadataSpec>,
) -> (String, Vec<Warning>) {
    let Some(sections) = spec.and_then(|s| s.sections(class_name)) else {
        let texts: Vec<&str> = blocks.iter().map(|(_, text)| text.as_str()).collect();
        return (texts.join("\n\n"), Vec::new());
    };

    let mut by_name: HashMap<&str, &str> = HashMap::new();
    for (name, text) in blocks {
        by_name.entry(name.as_str()).or_insert(text.as_str());
    }

    let mut warnings = Vec::new();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut parts: Vec<String> = Vec::new();

    for section in sections {
        if section.is_ignore() {
            placed.extend(section.function_names.iter().map(String::as_str));
            continue;
        }

        let mut rendered = Vec::new();
        for name in &section.function_names {
            match by_name.get(name.as_str()) {
                Some(text) => {
                    placed.insert(name.as_str());
                    rendered.push(*text);
                }
                None => warnings.push(Warning::UnknownFunction {
                    class: class_name.to_string(),
                    function: name.clone(),
                }),
            }
        }

        let mut part = Vec::new();
        if section.has_heading() {
            part.push(format!("### {}", section.name));
            if !section.description.trim().is_empty() {
                part.push(markdown::escape_text(section.description.trim()));
            }
        }
        part.extend(rendered.iter().map(|text| text.to_string()));
        if !part.is_empty() {
            parts.push(part.join("\n\n"));
        }
    }

    for (name, _) in blocks {
        if !placed.contains(name.as_str()) {
            warnings.push(Warning::Uncategorized {
                class: class_name.to_string(),
                function: name.clone(),
            });
        }
    }

    (parts.join("\n\n"), warnings)
}

/// Render one class to markdown, applying `spec` to its functions.
pub fn apply(
    class: &ClassBlock,
    spec: Option<&MetadataSpec>,
    import_path: Option<&str>,
) -> (RenderedDoc, Vec<Warning>) {
    let mut sections = Vec::new();
    sections.extend(markdown::render_class_variables(&class.variables));
    sections.extend(markdown::render_fields(&class.fields));

    let blocks: Vec<FunctionBlock> = class
        .functions
        .iter()
        .map(|f| (f.name.clone(), markdown::render_function(f)))
        .collect();
    let (body, warnings) = arrange(&class.name, &blocks, spec);
    if !body.is_empty() {
        sections.push(markdown::functions_section(&body));
    }

    let preamble = markdown::render_preamble(class, import_path);
    let text = markdown::join_sections(&preamble, &sections);
    (RenderedDoc::new(text), warnings)
}
