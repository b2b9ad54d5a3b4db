//! Table of contents: heading scan, GitHub-flavored anchor slugs, and the
//! directory-level TOC built from filenames.

use crate::model::{SourceText, TocEntry, Warning};
use std::collections::HashMap;

/// Expected class name → actual class name, for files whose class does not
/// follow the `my_widget.py` → `MyWidget` convention.
pub type Overrides = HashMap<String, String>;

/// An ATX heading found outside fenced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    /// Heading text as written (markdown escapes intact).
    pub text: String,
    pub line: usize,
}

/// Scan markdown for `#`-headings, skipping fenced code blocks so that
/// `# comment` lines inside examples are not taken for headings.
pub fn headings(text: &str) -> Vec<Heading> {
    let mut found = Vec::new();
    let mut fence: Option<&str> = None;

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if let Some(open) = fence {
            if trimmed.starts_with(open) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }

        if !line.starts_with('#') {
            continue;
        }
        let level = line.chars().take_while(|&c| c == '#').count();
        let rest = &line[level..];
        if level > 6 || !(rest.is_empty() || rest.starts_with(' ')) {
            continue;
        }
        found.push(Heading {
            level,
            text: rest.trim().to_string(),
            line: line_no,
        });
    }
    found
}

/// Derive TOC entries from rendered markdown. Repeated slugs get `-1`, `-2`
/// suffixes the way GitHub disambiguates them.
pub fn toc_from_doc(text: &str) -> Vec<TocEntry> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    headings(text)
        .into_iter()
        .map(|h| {
            let heading_text = unescape(&h.text);
            let base = github_slug(&heading_text);
            let n = counts.entry(base.clone()).or_insert(0);
            let anchor_slug = if *n == 0 {
                base
            } else {
                format!("{base}-{n}")
            };
            *n += 1;
            TocEntry {
                heading_text,
                anchor_slug,
                level: h.level,
            }
        })
        .collect()
}

/// Render entries as a nested bullet list, indented relative to the
/// shallowest level present.
pub fn render_toc(entries: &[TocEntry]) -> String {
    let min = entries.iter().map(|e| e.level).min().unwrap_or(1);
    let mut out = String::new();
    for entry in entries {
        out.push_str(&"  ".repeat(entry.level - min));
        out.push_str(&render_toc_item(&entry.heading_text, &format!("#{}", entry.anchor_slug)));
        out.push('\n');
    }
    out
}

/// Generate a TOC list item.
pub fn render_toc_item(title: &str, target: &str) -> String {
    format!("- [{}]({})", title, target)
}

/// GitHub heading anchor slug generation.
///
/// Matches the algorithm at:
/// https://github.com/jch/html-pipeline/blob/master/lib/html/pipeline/toc_filter.rb#L44-L45
///
/// - lowercase
/// - remove all chars that aren't alphanumeric, space, underscore, or hyphen
/// - replace spaces with hyphens
pub fn github_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
            slug.push(c);
        }
    }
    slug.replace(' ', "-")
}

/// Drop markdown backslash escapes: `\_\_init\_\_` → `__init__`.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
                continue;
            }
        }
        out.push(c);
    }
    out
}

// -- Filename ↔ class name ----------------------------------------------------

/// Module stem of a path: "src/my_widget.py" → "my_widget".
pub fn file_stem(path: &str) -> &str {
    let filename = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match filename.rfind('.') {
        Some(dot) if dot > 0 => &filename[..dot],
        _ => filename,
    }
}

/// Underscore-to-camel-case: "my_widget.py" → "MyWidget". Empty pieces
/// (leading or doubled underscores) are kept as `_`.
pub fn class_name_from_file(path: &str) -> String {
    file_stem(path)
        .split('_')
        .map(|piece| {
            let mut chars = piece.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => "_".to_string(),
            }
        })
        .collect()
}

/// The expected class name for a file, after applying overrides.
pub fn resolve_class_name(path: &str, overrides: &Overrides) -> String {
    let expected = class_name_from_file(path);
    overrides.get(&expected).cloned().unwrap_or(expected)
}

/// Class names declared at the top level of a source file, or named by a
/// level-1 heading of a rendered document.
pub fn declared_classes(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in text.lines() {
        let candidate = line
            .strip_prefix("class ")
            .map(|rest| rest.split(|c: char| c == '(' || c == ':').next().unwrap_or(rest))
            .or_else(|| line.strip_prefix("# "));
        if let Some(name) = candidate {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Resolve a file's class name and check it against the file's contents.
/// Falls back to the derived name with a warning when it is not declared.
pub fn lookup_class_name(file: &SourceText, overrides: &Overrides) -> (String, Option<Warning>) {
    let expected = resolve_class_name(&file.name, overrides);
    let declared = declared_classes(&file.text());
    if declared.iter().any(|n| *n == expected) {
        return (expected, None);
    }
    let warning = Warning::NameLookup {
        file: file.name.clone(),
        found: declared.into_iter().next(),
        expected: expected.clone(),
    };
    (expected, Some(warning))
}

/// Directory TOC: one line per file, linking to
/// `<link_prefix>/<stem>.md#<class anchor>`, optionally followed by the
/// import statement for the class.
pub fn toc_from_directory(
    files: &[SourceText],
    import_prefix: Option<&str>,
    link_prefix: &str,
    overrides: &Overrides,
) -> (String, Vec<Warning>) {
    let mut out = String::new();
    let mut warnings = Vec::new();
    let link_prefix = link_prefix.trim_end_matches('/');

    for file in files {
        let (class_name, warning) = lookup_class_name(file, overrides);
        warnings.extend(warning);

        let stem = file_stem(&file.name);
        let target = if link_prefix.is_empty() {
            format!("{stem}.md#{}", github_slug(&class_name))
        } else {
            format!("{link_prefix}/{stem}.md#{}", github_slug(&class_name))
        };
        out.push_str(&render_toc_item(&class_name, &target));
        if let Some(prefix) = import_prefix.filter(|p| !p.is_empty()) {
            out.push_str(&format!(" — `from {prefix}.{stem} import {class_name}`"));
        }
        out.push('\n');
    }
    (out, warnings)
}
