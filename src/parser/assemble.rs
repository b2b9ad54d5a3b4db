//! Section assembler — turns scanner fragments into `ClassBlock` records.
//!
//! Only the first class of a file owns functions: every public function found
//! after the first class header is attributed to it, even past a second class
//! header. Later classes still get their own block with description, class
//! variables and enum values. `ScanOptions::strict` rejects a second class
//! instead.

use super::scanner::{self, ClassHeader, DocBlock, FunctionHeader};
use super::signature::{self, CallStyle, DeclaredParam};
use crate::error::ScanError;
use crate::model::*;

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Raise `ScanError::SecondClass` instead of attributing functions to the
    /// first class.
    pub strict: bool,
}

/// Scan a whole file into its class blocks, in file order.
pub fn assemble(src: &SourceText, options: &ScanOptions) -> Result<Vec<ClassBlock>, ScanError> {
    let mut headers: Vec<(ClassHeader, usize)> = Vec::new();
    let mut cursor = 0;
    while let Some((header, next)) = scanner::find_class(src, cursor)? {
        cursor = header.line + 1;
        headers.push((header, next));
    }

    if options.strict {
        if let Some((second, _)) = headers.get(1) {
            return Err(ScanError::SecondClass {
                file: src.name.clone(),
                line: second.line + 1,
                name: second.name.clone(),
            });
        }
    }

    let class_lines: Vec<usize> = headers.iter().map(|(h, _)| h.line).collect();
    let mut classes = Vec::with_capacity(headers.len());

    for (k, (header, body_start)) in headers.iter().enumerate() {
        let span_end = class_lines.get(k + 1).copied().unwrap_or(src.len());
        let mut class = ClassBlock {
            name: header.name.clone(),
            bases: header.bases.clone(),
            description: header.description.clone(),
            source_position: header.line,
            ..Default::default()
        };

        let mut at = *body_start;
        while let Some((variable, next)) = scanner::find_class_variable(src, at, span_end)? {
            class.variables.push(variable);
            at = next;
        }

        if class.is_enum() {
            let end = scanner::top_level_end(src, *body_start).min(span_end);
            class.enum_values =
                scanner::find_enum_values(src, *body_start, end, header.body_indent);
        }

        classes.push(class);
    }

    if let Some((first, body_start)) = headers.first() {
        let (functions, fields) = assemble_functions(src, first, *body_start, &class_lines)?;
        classes[0].functions = functions;
        classes[0].fields = fields;
    }

    Ok(classes)
}

/// Collect every function after the first class header, plus the constructor's
/// fields.
fn assemble_functions(
    src: &SourceText,
    owner: &ClassHeader,
    start: usize,
    class_lines: &[usize],
) -> Result<(Vec<FunctionDoc>, Vec<Field>), ScanError> {
    let indents = [0, owner.body_indent];
    let mut headers: Vec<(FunctionHeader, usize)> = Vec::new();
    let mut cursor = start;
    while let Some((header, next)) = scanner::find_function(src, cursor, &indents)? {
        cursor = next;
        headers.push((header, next));
    }

    let mut functions = Vec::new();
    let mut fields = Vec::new();

    for (k, (header, next)) in headers.iter().enumerate() {
        if header.is_private {
            continue;
        }

        if header.name == CONSTRUCTOR {
            let next_def = headers.get(k + 1).map(|(h, _)| h.line).unwrap_or(src.len());
            let next_class = class_lines
                .iter()
                .copied()
                .find(|&l| l > header.line)
                .unwrap_or(src.len());
            let body_end = next_def.min(next_class);

            let mut at = *next;
            while let Some((field, after)) = scanner::find_field(src, at, body_end)? {
                fields.push(field);
                at = after;
            }
        }

        functions.push(assemble_function(&owner.name, header));
    }

    Ok((functions, fields))
}

/// Build one `FunctionDoc` from its header and doc block.
pub fn assemble_function(class_name: &str, header: &FunctionHeader) -> FunctionDoc {
    let declared = signature::parse_params(&header.params_text);
    let is_constructor = header.name == CONSTRUCTOR;
    let is_static = !is_constructor && (header.static_decorator || signature::is_static(&declared));
    let style = if is_constructor {
        CallStyle::Constructor
    } else if is_static {
        CallStyle::Static
    } else {
        CallStyle::Instance
    };

    let tags = header.doc.as_ref().map(parse_tags).unwrap_or_default();
    let parameters = tags
        .params
        .into_iter()
        .map(|(name, description)| documented_param(&declared, name, description))
        .collect();

    FunctionDoc {
        definition_signatures: signature::call_signatures(class_name, &header.name, style, &declared),
        name: header.name.clone(),
        is_static,
        parameters,
        return_description: tags.returns,
        body_description: tags.body,
    }
}

fn documented_param(declared: &[DeclaredParam], name: String, description: String) -> Parameter {
    let found = declared
        .iter()
        .find(|p| p.bare_name() == name.trim_start_matches('*'));
    Parameter {
        declared_type: found.map(|p| p.declared_type.clone()).unwrap_or_default(),
        default_value: found.and_then(|p| p.default_value.clone()),
        name,
        description,
    }
}

#[derive(Debug, Default)]
struct Tags {
    params: Vec<(String, String)>,
    returns: Option<String>,
    body: String,
}

#[derive(Clone, Copy)]
enum Target {
    Body,
    Param,
    Return,
}

/// Split a function's doc block into `:param` entries, the `:return:` entry
/// and the free-text body. Indented lines directly under a tag continue it.
fn parse_tags(block: &DocBlock) -> Tags {
    let mut tags = Tags::default();
    let mut body: Vec<&str> = Vec::new();
    let mut target = Target::Body;

    for line in &block.lines {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(":param ") {
            let (name, desc) = rest.split_once(':').unwrap_or((rest, ""));
            tags.params
                .push((name.trim().to_string(), desc.trim().to_string()));
            target = Target::Param;
            continue;
        }
        if let Some(rest) = trimmed
            .strip_prefix(":returns:")
            .or_else(|| trimmed.strip_prefix(":return:"))
        {
            tags.returns = Some(rest.trim().to_string());
            target = Target::Return;
            continue;
        }

        let continues = line.starts_with(char::is_whitespace) && !trimmed.is_empty();
        match target {
            Target::Param if continues => {
                if let Some((_, desc)) = tags.params.last_mut() {
                    append_words(desc, trimmed);
                }
            }
            Target::Return if continues => {
                if let Some(desc) = tags.returns.as_mut() {
                    append_words(desc, trimmed);
                }
            }
            _ => {
                target = Target::Body;
                body.push(line);
            }
        }
    }

    while body.last().is_some_and(|l| l.trim().is_empty()) {
        body.pop();
    }
    tags.body = body.join("\n").trim().to_string();
    tags
}

fn append_words(dest: &mut String, text: &str) {
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text);
}
