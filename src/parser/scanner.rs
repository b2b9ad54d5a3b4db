//! Line scanner — stateless cursor operations over a file's lines.
//!
//! Every `find_*` function takes the whole line sequence plus a start index,
//! never looks at lines before that index, and returns the parsed fragment
//! together with the index to resume scanning from.

use crate::error::ScanError;
use crate::model::{ClassVariable, EnumValue, Field, ModuleVariable, SourceText, CONSTRUCTOR};
use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^class[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*(?:\((.*)\))?[ \t]*:").unwrap()
});

static RE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)(?:async[ \t]+)?def[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(").unwrap()
});

static RE_DECORATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*@([A-Za-z_][A-Za-z0-9_.]*)").unwrap());

static RE_SELF_ASSIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*self\.([A-Za-z_][A-Za-z0-9_]*)").unwrap());

// NAME[: type][= value]
static RE_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*([A-Za-z_][A-Za-z0-9_]*)[ \t]*(?::[ \t]*([^=]+?))?[ \t]*(?:=[ \t]*(.+?))?[ \t]*$")
        .unwrap()
});

static RE_ENUM_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*([A-Za-z_][A-Za-z0-9_]*)[ \t]*=[ \t]*(.*)$").unwrap());

static RE_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#[ \t]?(.*)$").unwrap());

static RE_MODULE_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)[ \t]*(?::[ \t]*([^=]+?))?[ \t]*=[ \t]*(.+?)[ \t]*$").unwrap()
});

static RE_RELATIVE_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^from[ \t]+\.[A-Za-z0-9_.]*[ \t]+import[ \t]+(.+?)[ \t]*$").unwrap()
});

const SENTINEL: &str = r#"""""#;

// -- Fragments ----------------------------------------------------------------

/// A class header and its attached doc block.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassHeader {
    pub name: String,
    pub bases: Option<String>,
    pub description: String,
    pub line: usize,
    /// Indentation of the first non-blank body line.
    pub body_indent: usize,
}

/// A delimited doc-comment block.
#[derive(Debug, Clone, PartialEq)]
pub struct DocBlock {
    /// Role tag after the opening sentinel, e.g. `field` for `""":field`.
    pub tag: Option<String>,
    /// De-indented content lines, outer blank lines trimmed.
    pub lines: Vec<String>,
    pub open_line: usize,
    /// Index of the line after the closing sentinel.
    pub next: usize,
}

impl DocBlock {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A function header. Private functions carry no signature and no doc block.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionHeader {
    pub name: String,
    pub line: usize,
    pub indent: usize,
    pub is_private: bool,
    /// Directly decorated with `@staticmethod`.
    pub static_decorator: bool,
    /// Text between the signature's outer parentheses.
    pub params_text: String,
    pub doc: Option<DocBlock>,
}

// -- Classes ------------------------------------------------------------------

/// Find the next public class header at or after `start`.
pub fn find_class(
    src: &SourceText,
    start: usize,
) -> Result<Option<(ClassHeader, usize)>, ScanError> {
    for i in start..src.len() {
        let Some(caps) = RE_CLASS.captures(&src.lines[i]) else {
            continue;
        };
        let name = caps[1].to_string();
        if name.starts_with('_') {
            continue;
        }
        let bases = caps
            .get(2)
            .map(|m| m.as_str().trim().to_string())
            .filter(|b| !b.is_empty());
        let body_indent = next_non_blank(src, i + 1)
            .map(|j| indentation(&src.lines[j]))
            .unwrap_or(4);

        let (description, next) = match doc_block_at(src, i + 1)? {
            Some(block) if block.tag.is_none() => (block.text(), block.next),
            _ => (String::new(), i + 1),
        };

        let header = ClassHeader {
            name,
            bases,
            description,
            line: i,
            body_indent,
        };
        return Ok(Some((header, next)));
    }
    Ok(None)
}

/// Index of the next top-level (unindented, non-blank, non-comment) line at or
/// after `start`, or the end of input.
pub fn top_level_end(src: &SourceText, start: usize) -> usize {
    (start..src.len())
        .find(|&i| {
            let line = &src.lines[i];
            !line.trim().is_empty() && indentation(line) == 0 && !line.starts_with('#')
        })
        .unwrap_or(src.len())
}

// -- Doc blocks ---------------------------------------------------------------

/// Read the doc block opening at the first non-blank line at or after `start`.
/// Returns `None` if that line is not an opening sentinel.
pub fn doc_block_at(src: &SourceText, start: usize) -> Result<Option<DocBlock>, ScanError> {
    match next_non_blank(src, start) {
        Some(j) if src.lines[j].trim_start().starts_with(SENTINEL) => read_block(src, j).map(Some),
        _ => Ok(None),
    }
}

/// Find the next block tagged `tag` within `[start, end)`, stepping over any
/// other blocks whole so their contents are never mistaken for markers.
pub fn find_tagged_block(
    src: &SourceText,
    start: usize,
    end: usize,
    tag: &str,
) -> Result<Option<DocBlock>, ScanError> {
    let mut i = start;
    while i < end.min(src.len()) {
        if !src.lines[i].trim_start().starts_with(SENTINEL) {
            i += 1;
            continue;
        }
        let block = read_block(src, i)?;
        if block.tag.as_deref() == Some(tag) {
            return Ok(Some(block));
        }
        i = block.next;
    }
    Ok(None)
}

/// Read a block whose opening sentinel is on line `open`.
fn read_block(src: &SourceText, open: usize) -> Result<DocBlock, ScanError> {
    let first = src.lines[open].trim_start();
    let mut rest = &first[SENTINEL.len()..];

    let mut tag = None;
    if let Some(stripped) = rest.strip_prefix(':') {
        let end = stripped
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(stripped.len());
        if end > 0 {
            tag = Some(stripped[..end].to_string());
            rest = &stripped[end..];
        }
    }

    // Single-line block
    if let Some(close) = rest.find(SENTINEL) {
        let text = rest[..close].trim();
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            vec![text.to_string()]
        };
        return Ok(DocBlock {
            tag,
            lines,
            open_line: open,
            next: open + 1,
        });
    }

    let head = rest.trim();
    let mut body: Vec<&str> = Vec::new();
    for j in open + 1..src.len() {
        let line = src.lines[j].as_str();
        if let Some(close) = line.find(SENTINEL) {
            let before = &line[..close];
            if !before.trim().is_empty() {
                body.push(before);
            }
            let mut lines = Vec::new();
            if !head.is_empty() {
                lines.push(head.to_string());
            }
            lines.extend(dedent(&body));
            trim_blank_edges(&mut lines);
            return Ok(DocBlock {
                tag,
                lines,
                open_line: open,
                next: j + 1,
            });
        }
        body.push(line);
    }

    Err(ScanError::UnterminatedBlock {
        file: src.name.clone(),
        line: open + 1,
    })
}

// -- Functions ----------------------------------------------------------------

/// Find the next function header at or after `start` whose indentation is one
/// of `indents`. Private names are reported without reading their signature
/// or doc block; scanning resumes on the following line.
pub fn find_function(
    src: &SourceText,
    start: usize,
    indents: &[usize],
) -> Result<Option<(FunctionHeader, usize)>, ScanError> {
    let mut static_decorator = false;
    for i in start..src.len() {
        let line = &src.lines[i];

        if let Some(caps) = RE_DECORATOR.captures(line) {
            if &caps[1] == "staticmethod" {
                static_decorator = true;
            }
            continue;
        }

        let Some(caps) = RE_DEF.captures(line) else {
            if !line.trim().is_empty() {
                static_decorator = false;
            }
            continue;
        };
        let indent = indentation(&caps[1]);
        if !indents.contains(&indent) {
            static_decorator = false;
            continue;
        }

        let name = caps[2].to_string();
        if name.starts_with('_') && name != CONSTRUCTOR {
            let header = FunctionHeader {
                name,
                line: i,
                indent,
                is_private: true,
                static_decorator,
                params_text: String::new(),
                doc: None,
            };
            return Ok(Some((header, i + 1)));
        }

        let open = caps.get(0).map(|m| m.end()).unwrap_or(line.len());
        let (params_text, sig_end) = read_signature(src, i, open, &name)?;
        let doc = match doc_block_at(src, sig_end)? {
            Some(block) if block.tag.is_none() => Some(block),
            _ => None,
        };
        let next = doc.as_ref().map(|d| d.next).unwrap_or(sig_end);

        let header = FunctionHeader {
            name,
            line: i,
            indent,
            is_private: false,
            static_decorator,
            params_text,
            doc,
        };
        return Ok(Some((header, next)));
    }
    Ok(None)
}

/// Collect the parameter text of a signature whose `(` ends at byte `open` of
/// line `start`. Returns the text and the index of the line after the header.
fn read_signature(
    src: &SourceText,
    start: usize,
    open: usize,
    name: &str,
) -> Result<(String, usize), ScanError> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut params = String::new();
    let mut closed = false;

    for j in start..src.len() {
        let line = &src.lines[j];
        let text = if j == start { &line[open..] } else { line.as_str() };
        if j > start && !closed {
            params.push(' ');
        }

        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if closed {
                // Return annotation; the header ends at the first ':'
                match c {
                    ':' => {
                        let params = params.split_whitespace().collect::<Vec<_>>().join(" ");
                        return Ok((params, j + 1));
                    }
                    '#' => break,
                    _ => continue,
                }
            }
            match quote {
                Some(_) if c == '\\' => {
                    params.push(c);
                    if let Some(escaped) = chars.next() {
                        params.push(escaped);
                    }
                    continue;
                }
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None => match c {
                    '\'' | '"' => quote = Some(c),
                    '(' | '[' | '{' => depth += 1,
                    ')' | ']' | '}' => {
                        depth -= 1;
                        if depth == 0 {
                            closed = true;
                            continue;
                        }
                    }
                    '#' => break,
                    _ => {}
                },
            }
            params.push(c);
        }
    }

    Err(ScanError::UnterminatedSignature {
        file: src.name.clone(),
        line: start + 1,
        name: name.to_string(),
    })
}

// -- Fields and class variables ----------------------------------------------

/// Find the next `""":field` block in `[start, end)` and the `self.<name>`
/// assignment that follows it.
pub fn find_field(
    src: &SourceText,
    start: usize,
    end: usize,
) -> Result<Option<(Field, usize)>, ScanError> {
    let Some(block) = find_tagged_block(src, start, end, "field")? else {
        return Ok(None);
    };
    let target = next_non_blank(src, block.next)
        .filter(|&j| j < end)
        .and_then(|j| RE_SELF_ASSIGN.captures(&src.lines[j]).map(|c| (j, c[1].to_string())));
    match target {
        Some((j, name)) => Ok(Some((
            Field {
                name,
                description: block.text(),
            },
            j + 1,
        ))),
        None => Err(ScanError::MalformedHeader {
            file: src.name.clone(),
            line: block.open_line + 1,
            what: "field",
        }),
    }
}

/// Find the next `""":class_var` block in `[start, end)` and the assignment
/// that follows it.
pub fn find_class_variable(
    src: &SourceText,
    start: usize,
    end: usize,
) -> Result<Option<(ClassVariable, usize)>, ScanError> {
    let Some(block) = find_tagged_block(src, start, end, "class_var")? else {
        return Ok(None);
    };
    let target = next_non_blank(src, block.next)
        .filter(|&j| j < end)
        .and_then(|j| RE_ASSIGN.captures(&src.lines[j]).map(|c| (j, c)));
    match target {
        Some((j, caps)) => {
            let variable = ClassVariable {
                name: caps[1].to_string(),
                declared_type: caps.get(2).map(|m| m.as_str().trim().to_string()),
                literal_value: caps
                    .get(3)
                    .map(|m| strip_line_comment(m.as_str()).trim().to_string()),
                description: block.text(),
            };
            Ok(Some((variable, j + 1)))
        }
        None => Err(ScanError::MalformedHeader {
            file: src.name.clone(),
            line: block.open_line + 1,
            what: "class variable",
        }),
    }
}

// -- Enums --------------------------------------------------------------------

/// Enum members at `body_indent` in `[start, end)`, stopping at the first
/// function header. Each member's description is its trailing comment.
pub fn find_enum_values(
    src: &SourceText,
    start: usize,
    end: usize,
    body_indent: usize,
) -> Vec<EnumValue> {
    let mut values = Vec::new();
    for line in &src.lines[start.min(src.len())..end.min(src.len())] {
        if line.trim().is_empty() || indentation(line) != body_indent {
            continue;
        }
        if RE_DEF.is_match(line) || RE_DECORATOR.is_match(line) {
            break;
        }
        let Some(caps) = RE_ENUM_MEMBER.captures(line) else {
            continue;
        };
        let rhs = &caps[2];
        let value = strip_line_comment(rhs).trim().to_string();
        let description = rhs
            .get(strip_line_comment(rhs).len()..)
            .and_then(|c| c.strip_prefix('#'))
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        values.push(EnumValue {
            name: caps[1].to_string(),
            literal_value: value,
            description,
        });
    }
    values
}

// -- Module variables ---------------------------------------------------------

/// Module-level assignments directly preceded by a `# comment` line.
pub fn scan_module_variables(src: &SourceText) -> Vec<ModuleVariable> {
    let mut variables = Vec::new();
    for pair in src.lines.windows(2) {
        let (Some(comment), Some(assign)) =
            (RE_COMMENT.captures(&pair[0]), RE_MODULE_ASSIGN.captures(&pair[1]))
        else {
            continue;
        };
        variables.push(ModuleVariable {
            name: assign[1].to_string(),
            declared_type: assign.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
            value: strip_line_comment(&assign[3]).trim().to_string(),
            description: comment[1].trim().to_string(),
        });
    }
    variables
}

// -- Package re-exports -------------------------------------------------------

/// Names a package `__init__` pulls in with `from .module import Name`.
/// Parenthesized lists may span lines; `Name as Alias` yields `Name`.
pub fn scan_reexports(src: &SourceText) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut i = 0;
    while i < src.len() {
        let Some(caps) = RE_RELATIVE_IMPORT.captures(&src.lines[i]) else {
            i += 1;
            continue;
        };
        let mut list = strip_line_comment(&caps[1]).trim().to_string();
        if list.starts_with('(') {
            while !list.contains(')') && i + 1 < src.len() {
                i += 1;
                list.push(',');
                list.push_str(strip_line_comment(&src.lines[i]));
            }
        }
        let list = list.trim_start_matches('(');
        let list = list.split(')').next().unwrap_or(list);
        for item in list.split(',') {
            let name = item.split_whitespace().next().unwrap_or("");
            if name.is_empty() || name == "*" || names.iter().any(|n| n == name) {
                continue;
            }
            names.push(name.to_string());
        }
        i += 1;
    }
    names
}

// -- Helpers ------------------------------------------------------------------

fn next_non_blank(src: &SourceText, start: usize) -> Option<usize> {
    (start..src.len()).find(|&i| !src.lines[i].trim().is_empty())
}

/// Width of leading whitespace; a tab counts as four columns.
pub fn indentation(line: &str) -> usize {
    line.chars()
        .take_while(|c| c.is_whitespace())
        .map(|c| if c == '\t' { 4 } else { 1 })
        .sum()
}

/// Cut a trailing `#` comment that is not inside a string literal.
fn strip_line_comment(text: &str) -> &str {
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '#' => return &text[..i],
            None => {}
        }
    }
    text
}

/// Remove the common leading indentation of non-blank lines.
fn dedent(lines: &[&str]) -> Vec<String> {
    let min = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                skip_chars(l, min).trim_end().to_string()
            }
        })
        .collect()
}

/// The rest of `line` after its first `n` chars.
fn skip_chars(line: &str, n: usize) -> &str {
    match line.char_indices().nth(n) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}

fn trim_blank_edges(lines: &mut Vec<String>) {
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(text: &str) -> SourceText {
        SourceText::new("test.py", text)
    }

    #[test]
    fn class_with_description() {
        let s = src("import os\n\nclass Widget(Base):\n    \"\"\"\n    A widget.\n\n      Indented.\n    \"\"\"\n\n    X = 1\n");
        let (header, next) = find_class(&s, 0).unwrap().unwrap();
        assert_eq!(header.name, "Widget");
        assert_eq!(header.bases.as_deref(), Some("Base"));
        assert_eq!(header.description, "A widget.\n\n  Indented.");
        assert_eq!(header.line, 2);
        assert_eq!(header.body_indent, 4);
        assert_eq!(next, 8);
    }

    #[test]
    fn private_class_skipped() {
        let s = src("class _Hidden:\n    pass\nclass Shown:\n    pass\n");
        let (header, _) = find_class(&s, 0).unwrap().unwrap();
        assert_eq!(header.name, "Shown");
        assert!(header.description.is_empty());
    }

    #[test]
    fn single_line_block() {
        let s = src("class A:\n    \"\"\"Short.\"\"\"\n");
        let (header, next) = find_class(&s, 0).unwrap().unwrap();
        assert_eq!(header.description, "Short.");
        assert_eq!(next, 2);
    }

    #[test]
    fn unterminated_block_reports_opening_line() {
        let s = src("class A:\n    \"\"\"\n    never closed\n");
        let err = find_class(&s, 0).unwrap_err();
        assert_eq!(
            err,
            ScanError::UnterminatedBlock {
                file: "test.py".to_string(),
                line: 2
            }
        );
    }

    #[test]
    fn multi_line_signature() {
        let s = src("    def resize(self, w: int,\n               h: int = 10) -> None:\n        \"\"\"\n        Resize.\n        \"\"\"\n");
        let (header, next) = find_function(&s, 0, &[0, 4]).unwrap().unwrap();
        assert_eq!(header.name, "resize");
        assert_eq!(header.params_text, "self, w: int, h: int = 10");
        assert_eq!(header.doc.unwrap().lines, vec!["Resize."]);
        assert_eq!(next, 5);
    }

    #[test]
    fn private_function_not_parsed() {
        let s = src("    def _helper(self,\n\n    def public(self):\n        pass\n");
        let (header, next) = find_function(&s, 0, &[4]).unwrap().unwrap();
        assert!(header.is_private);
        assert!(header.doc.is_none());
        assert_eq!(next, 1);
        let (header, _) = find_function(&s, next, &[4]).unwrap().unwrap();
        assert_eq!(header.name, "public");
    }

    #[test]
    fn unterminated_signature() {
        let s = src("def broken(a,\n    b\n");
        assert!(matches!(
            find_function(&s, 0, &[0]),
            Err(ScanError::UnterminatedSignature { line: 1, .. })
        ));
    }

    #[test]
    fn static_decorator_detected() {
        let s = src("    @staticmethod\n    def make(x):\n        pass\n");
        let (header, _) = find_function(&s, 0, &[4]).unwrap().unwrap();
        assert!(header.static_decorator);
    }

    #[test]
    fn nested_def_ignored() {
        let s = src("    def outer(self):\n        def inner():\n            pass\n");
        let (header, next) = find_function(&s, 0, &[4]).unwrap().unwrap();
        assert_eq!(header.name, "outer");
        assert!(find_function(&s, next, &[4]).unwrap().is_none());
    }

    #[test]
    fn field_after_tagged_block() {
        let s = src("        \"\"\":field\n        Unique id.\n        \"\"\"\n        self.id: int = id\n");
        let (field, next) = find_field(&s, 0, s.len()).unwrap().unwrap();
        assert_eq!(field.name, "id");
        assert_eq!(field.description, "Unique id.");
        assert_eq!(next, 4);
    }

    #[test]
    fn field_without_assignment_is_error() {
        let s = src("        \"\"\":field\n        Dangling.\n        \"\"\"\n        x = 1\n");
        assert!(matches!(
            find_field(&s, 0, s.len()),
            Err(ScanError::MalformedHeader { what: "field", .. })
        ));
    }

    #[test]
    fn class_variable_with_type_and_value() {
        let s = src("    \"\"\":class_var\n    The limit.\n    \"\"\"\n    LIMIT: int = 10  # hard cap\n");
        let (var, _) = find_class_variable(&s, 0, s.len()).unwrap().unwrap();
        assert_eq!(var.name, "LIMIT");
        assert_eq!(var.declared_type.as_deref(), Some("int"));
        assert_eq!(var.literal_value.as_deref(), Some("10"));
        assert_eq!(var.description, "The limit.");
    }

    #[test]
    fn untagged_blocks_are_stepped_over() {
        let s = src("    \"\"\"\n    Mentions :field in prose.\n    \"\"\"\n    \"\"\":class_var\n    Max.\n    \"\"\"\n    MAX = 3\n");
        assert!(find_tagged_block(&s, 0, s.len(), "field").unwrap().is_none());
        let block = find_tagged_block(&s, 0, s.len(), "class_var").unwrap().unwrap();
        assert_eq!(block.open_line, 3);
        assert_eq!(block.lines, vec!["Max."]);
    }

    #[test]
    fn enum_members_with_comments() {
        let s = src("class Color(Enum):\n    \"\"\"\n    Colors.\n    \"\"\"\n    red = 1  # Warm.\n    blue = \"#00f\"\n\n    def f(self):\n        x = 2\n");
        let values = find_enum_values(&s, 4, s.len(), 4);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].literal_value, "1");
        assert_eq!(values[0].description, "Warm.");
        assert_eq!(values[1].literal_value, "\"#00f\"");
        assert_eq!(values[1].description, "");
    }

    #[test]
    fn module_variables() {
        let s = src("# Max retries.\nRETRIES: int = 3\nOTHER = 4\n# Name.\nNAME = \"x\"\n");
        let vars = scan_module_variables(&s);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "RETRIES");
        assert_eq!(vars[0].declared_type, "int");
        assert_eq!(vars[0].value, "3");
        assert_eq!(vars[1].description, "Name.");
    }

    #[test]
    fn dedent_counts_chars_not_bytes() {
        let lines = ["        Plain.", "       \u{a0}With nbsp.", "          Deeper."];
        assert_eq!(dedent(&lines), vec!["Plain.", "With nbsp.", "  Deeper."]);
    }

    #[test]
    fn nbsp_indented_doc_line_does_not_panic() {
        let s = src("class A:\n    def f(self):\n        \"\"\"\n       \u{a0}indented with nbsp\n        \"\"\"\n");
        let (header, _) = find_function(&s, 1, &[4]).unwrap().unwrap();
        let block = header.doc.unwrap();
        assert_eq!(block.lines, vec!["indented with nbsp"]);
    }

    #[test]
    fn package_reexports() {
        let s = src("from .widget import Widget\nfrom .shapes import (\n    Circle,\n    Square as Box,  # alias\n)\nfrom os import path\nfrom . import helpers\n");
        assert_eq!(scan_reexports(&s), vec!["Widget", "Circle", "Square", "helpers"]);
    }

    #[test]
    fn top_level_end_finds_next_statement() {
        let s = src("class A:\n    x = 1\n\n# note\nclass B:\n");
        assert_eq!(top_level_end(&s, 1), 4);
    }
}
