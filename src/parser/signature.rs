//! Declaration-side parameter parsing and call-signature rendering.
//!
//! Types and defaults come from the declaration text, never from the
//! doc block. Splitting respects brackets and string literals so that
//! `x: Dict[str, int] = {"a": 1}` stays a single parameter.

/// One entry of a declaration's parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredParam {
    /// Name including any `*` / `**` prefix.
    pub name: String,
    pub declared_type: String,
    pub default_value: Option<String>,
}

impl DeclaredParam {
    fn parse(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        // Bare `*` and `/` are markers, not parameters.
        if entry.is_empty() || entry == "*" || entry == "/" {
            return None;
        }

        let (head, default_value) = match find_top_level(entry, '=') {
            Some(eq) => (&entry[..eq], Some(entry[eq + 1..].trim().to_string())),
            None => (entry, None),
        };
        let (name, declared_type) = match find_top_level(head, ':') {
            Some(colon) => (head[..colon].trim(), head[colon + 1..].trim()),
            None => (head.trim(), ""),
        };

        Some(Self {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            default_value,
        })
    }

    /// Name without `*` / `**`.
    pub fn bare_name(&self) -> &str {
        self.name.trim_start_matches('*')
    }

    fn is_receiver(&self) -> bool {
        self.name == "self" || self.name == "cls"
    }
}

/// Split a declaration's parameter text into declared parameters.
pub fn parse_params(params_text: &str) -> Vec<DeclaredParam> {
    split_top_level(params_text, ',')
        .into_iter()
        .filter_map(DeclaredParam::parse)
        .collect()
}

/// Whether the declaration lacks a leading `self` receiver.
pub fn is_static(params: &[DeclaredParam]) -> bool {
    params.first().map(|p| p.name != "self").unwrap_or(true)
}

/// How a call to the function is spelled in rendered signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStyle {
    /// `Widget(...)`
    Constructor,
    /// `Widget.make(...)`
    Static,
    /// `self.resize(...)`
    Instance,
}

/// Render the short call signature and, when any parameter has a default,
/// the long form that assigns every default explicitly.
pub fn call_signatures(
    class_name: &str,
    function_name: &str,
    style: CallStyle,
    params: &[DeclaredParam],
) -> Vec<String> {
    let callee = match style {
        CallStyle::Constructor => class_name.to_string(),
        CallStyle::Static => format!("{class_name}.{function_name}"),
        CallStyle::Instance => format!("self.{function_name}"),
    };
    let params: Vec<&DeclaredParam> = params.iter().filter(|p| !p.is_receiver()).collect();

    let short: Vec<&str> = params
        .iter()
        .filter(|p| p.default_value.is_none())
        .map(|p| p.name.as_str())
        .collect();
    let mut signatures = vec![format!("{callee}({})", short.join(", "))];

    if params.iter().any(|p| p.default_value.is_some()) {
        let long: Vec<String> = params
            .iter()
            .map(|p| match &p.default_value {
                Some(default) => format!("{}={}", p.name, default),
                None => p.name.clone(),
            })
            .collect();
        signatures.push(format!("{callee}({})", long.join(", ")));
    }
    signatures
}

/// Split on `sep` where it is not nested in brackets or string literals.
fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for_each_top_level(text, |i, c| {
        if c == sep {
            parts.push(&text[last..i]);
            last = i + c.len_utf8();
        }
        false
    });
    parts.push(&text[last..]);
    parts
}

fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut found = None;
    for_each_top_level(text, |i, c| {
        if c == target {
            found = Some(i);
            return true;
        }
        false
    });
    found
}

/// Visit characters outside brackets and quotes until `visit` returns true.
fn for_each_top_level(text: &str, mut visit: impl FnMut(usize, char) -> bool) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if depth == 0 && visit(i, c) => return,
            _ => {}
        }
    }
}
