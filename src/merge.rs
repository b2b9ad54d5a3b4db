//! Inheritance merge over rendered documents.
//!
//! Documents are parsed back into section records (class-variable rows,
//! field bullets, function blocks) using the heading scan from [`crate::toc`].
//! Parent members whose names the child does not define are appended after
//! the child's own members; a child member always wins over a parent one.

use crate::error::ScanError;
use crate::metadata::MetadataSpec;
use crate::model::{RenderedDoc, SourceText, Warning, CONSTRUCTOR};
use crate::render::markdown::{self, CLASS_VARIABLES, FIELDS, FUNCTIONS, RULE};
use crate::toc::{self, Heading, Overrides};
use crate::{generate, sort, DocOptions};
use std::ops::Range;

/// A named entry of a list-like section: a table row or a field bullet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub text: String,
}

/// One entry of the `## Functions` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionItem {
    /// A `####` function block, keyed by its unescaped name.
    Function { name: String, text: String },
    /// A `###` metadata section heading with its description.
    Heading { text: String },
}

/// A rendered class document split into mergeable parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    /// Text of the first level-1 heading, unescaped.
    pub title: String,
    preamble: String,
    pub variables: Vec<Member>,
    pub fields: Vec<Member>,
    pub functions: Vec<FunctionItem>,
    /// Level-2 sections this module does not merge, kept verbatim.
    extra: Vec<String>,
    /// Everything from a second level-1 heading on.
    trailer: String,
}

impl ParsedDoc {
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let heads = toc::headings(text);

        let mut titles = heads.iter().filter(|h| h.level == 1);
        let title = titles.next().map(|h| toc::unescape(&h.text)).unwrap_or_default();
        let end = titles.next().map(|h| h.line).unwrap_or(lines.len());

        let sections: Vec<&Heading> = heads
            .iter()
            .filter(|h| h.level == 2 && h.line < end)
            .collect();
        let preamble_end = sections.first().map(|h| h.line).unwrap_or(end);

        let mut doc = ParsedDoc {
            title,
            preamble: trim_lines(&lines[..preamble_end]).join("\n"),
            trailer: lines[end..].join("\n").trim_end().to_string(),
            ..Default::default()
        };

        for (k, head) in sections.iter().enumerate() {
            let stop = sections.get(k + 1).map(|h| h.line).unwrap_or(end);
            let body = trim_lines(&lines[head.line + 1..stop]);
            match toc::unescape(&head.text).as_str() {
                CLASS_VARIABLES => doc.variables = parse_rows(body),
                FIELDS => doc.fields = parse_bullets(body),
                FUNCTIONS => doc.functions = parse_functions(&lines, &heads, head.line + 1..stop),
                _ => doc
                    .extra
                    .push(trim_lines(&lines[head.line..stop]).join("\n")),
            }
        }
        doc
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function_blocks().any(|(n, _)| n == name)
    }

    fn function_blocks(&self) -> impl Iterator<Item = (&str, &str)> {
        self.functions.iter().filter_map(|item| match item {
            FunctionItem::Function { name, text } => Some((name.as_str(), text.as_str())),
            FunctionItem::Heading { .. } => None,
        })
    }

    /// Re-render with the same layout the assembler produces.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();
        if !self.variables.is_empty() {
            let rows: Vec<String> = self.variables.iter().map(|m| m.text.clone()).collect();
            sections.push(markdown::class_variables_section(&rows));
        }
        if !self.fields.is_empty() {
            let items: Vec<String> = self.fields.iter().map(|m| m.text.clone()).collect();
            sections.push(markdown::fields_section(&items));
        }
        if !self.functions.is_empty() {
            let body: Vec<&str> = self
                .functions
                .iter()
                .map(|item| match item {
                    FunctionItem::Function { text, .. } | FunctionItem::Heading { text } => {
                        text.as_str()
                    }
                })
                .collect();
            sections.push(markdown::functions_section(&body.join("\n\n")));
        }
        sections.extend(self.extra.iter().cloned());

        let mut text = markdown::join_sections(&self.preamble, &sections);
        if !self.trailer.is_empty() {
            text.push('\n');
            text.push_str(&self.trailer);
            text.push('\n');
        }
        text
    }
}

/// Merge `parents` into `child`, in order. When `spec` has an entry for the
/// child class, the merged functions are regrouped by its sections.
pub fn merge(child: &str, parents: &[&str], spec: Option<&MetadataSpec>) -> (RenderedDoc, Vec<Warning>) {
    let mut doc = ParsedDoc::parse(child);

    for parent_text in parents {
        let parent = ParsedDoc::parse(parent_text);
        for (name, text) in parent.function_blocks() {
            if doc.has_function(name) {
                continue;
            }
            doc.functions.push(FunctionItem::Function {
                name: name.to_string(),
                text: rename_calls(text, &parent.title, &doc.title),
            });
        }
        merge_members(&mut doc.variables, parent.variables);
        merge_members(&mut doc.fields, parent.fields);
    }

    // Neither side declares a constructor; the child is still callable.
    if !parents.is_empty() && !doc.has_function(CONSTRUCTOR) && !doc.title.is_empty() {
        doc.functions.insert(
            0,
            FunctionItem::Function {
                name: CONSTRUCTOR.to_string(),
                text: format!("#### {}\n\n**`{}()`**", markdown::escape_heading(CONSTRUCTOR), doc.title),
            },
        );
    }

    let mut warnings = Vec::new();
    if spec.is_some_and(|s| s.contains(&doc.title)) {
        let blocks: Vec<sort::FunctionBlock> = doc
            .function_blocks()
            .map(|(name, text)| (name.to_string(), text.to_string()))
            .collect();
        let (body, arrange_warnings) = sort::arrange(&doc.title, &blocks, spec);
        warnings = arrange_warnings;
        doc.functions = parse_functions_text(&body);
    }

    (RenderedDoc::new(doc.render()), warnings)
}

/// One child's merge result in a directory run.
#[derive(Debug)]
pub struct Inherited {
    pub file: String,
    pub class_name: String,
    pub doc: Result<RenderedDoc, ScanError>,
    pub warnings: Vec<Warning>,
}

/// Generate the base document once, then generate and merge each child
/// against it. Fails only when the base itself cannot be scanned; each
/// child carries its own result.
pub fn merge_directory(
    base: &SourceText,
    children: &[SourceText],
    overrides: &Overrides,
    spec: Option<&MetadataSpec>,
    options: &DocOptions,
) -> Result<(Vec<Warning>, Vec<Inherited>), ScanError> {
    let (_, base_lookup) = toc::lookup_class_name(base, overrides);
    let (base_doc, mut base_warnings) = generate(base, spec, options)?;
    base_warnings.extend(base_lookup);

    let results = children
        .iter()
        .map(|child| {
            let (class_name, lookup) = toc::lookup_class_name(child, overrides);
            let mut warnings: Vec<Warning> = lookup.into_iter().collect();
            // Children render in source order; the merge applies metadata
            // once every inherited function is present.
            let doc = generate(child, None, options).map(|(child_doc, _)| {
                let (merged, merge_warnings) = merge(&child_doc.text, &[base_doc.text.as_str()], spec);
                warnings.extend(merge_warnings);
                merged
            });
            Inherited {
                file: child.name.clone(),
                class_name,
                doc,
                warnings,
            }
        })
        .collect();

    Ok((base_warnings, results))
}

// -- Section parsing ----------------------------------------------------------

fn merge_members(own: &mut Vec<Member>, inherited: Vec<Member>) {
    for member in inherited {
        if !own.iter().any(|m| m.name == member.name) {
            own.push(member);
        }
    }
}

/// Point inherited call signatures at the child class.
fn rename_calls(text: &str, parent: &str, child: &str) -> String {
    if parent.is_empty() || child.is_empty() || parent == child {
        return text.to_string();
    }
    text.replace(&format!("**`{parent}("), &format!("**`{child}("))
        .replace(&format!("**`{parent}."), &format!("**`{child}."))
}

/// Drop leading blank lines and trailing blank or rule lines.
fn trim_lines<'a, 'b>(mut lines: &'a [&'b str]) -> &'a [&'b str] {
    while let [first, rest @ ..] = lines {
        if !first.trim().is_empty() {
            break;
        }
        lines = rest;
    }
    while let [rest @ .., last] = lines {
        let last = last.trim();
        if !last.is_empty() && last != RULE {
            break;
        }
        lines = rest;
    }
    lines
}

/// Name between the first pair of backticks after `prefix`.
fn backticked_name(line: &str, prefix: &str) -> Option<String> {
    let rest = line.strip_prefix(prefix)?;
    rest.split_once('`').map(|(name, _)| name.to_string())
}

/// Class-variable table rows. Header and divider rows carry no backticked
/// name and are skipped.
fn parse_rows(body: &[&str]) -> Vec<Member> {
    body.iter()
        .filter_map(|line| {
            backticked_name(line, "| `").map(|name| Member {
                name,
                text: line.to_string(),
            })
        })
        .collect()
}

/// Field bullets with their continuation lines.
fn parse_bullets(body: &[&str]) -> Vec<Member> {
    let mut items: Vec<Member> = Vec::new();
    for line in body {
        if let Some(name) = backticked_name(line, "- `") {
            items.push(Member {
                name,
                text: line.to_string(),
            });
        } else if let Some(item) = items.last_mut() {
            item.text.push('\n');
            item.text.push_str(line);
        }
    }
    for item in &mut items {
        item.text.truncate(item.text.trim_end().len());
    }
    items
}

/// Split function-section lines in `range` into items at their `###` and
/// `####` headings.
fn parse_functions(lines: &[&str], heads: &[Heading], range: Range<usize>) -> Vec<FunctionItem> {
    let marks: Vec<&Heading> = heads
        .iter()
        .filter(|h| range.contains(&h.line) && (h.level == 3 || h.level == 4))
        .collect();

    marks
        .iter()
        .enumerate()
        .map(|(k, mark)| {
            let item_end = marks.get(k + 1).map(|h| h.line).unwrap_or(range.end);
            let text = trim_lines(&lines[mark.line..item_end]).join("\n");
            if mark.level == 4 {
                FunctionItem::Function {
                    name: toc::unescape(&mark.text),
                    text,
                }
            } else {
                FunctionItem::Heading { text }
            }
        })
        .collect()
}

fn parse_functions_text(body: &str) -> Vec<FunctionItem> {
    let lines: Vec<&str> = body.lines().collect();
    parse_functions(&lines, &toc::headings(body), 0..lines.len())
}
