//! Data model for extracted class documentation — format-agnostic.

use serde::Serialize;

/// One source file, split into lines. Line indices are 0-based.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Display name used in diagnostics (usually the file path).
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceText {
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Module stem of the file name: "pkg/my_widget.py" → "my_widget".
    pub fn module_name(&self) -> &str {
        crate::toc::file_stem(&self.name)
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// A single documented class and its members.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ClassBlock {
    pub name: String,
    /// Raw base list, e.g. "Enum" for `class Color(Enum):`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bases: Option<String>,
    pub description: String,
    pub variables: Vec<ClassVariable>,
    pub fields: Vec<Field>,
    pub functions: Vec<FunctionDoc>,
    pub enum_values: Vec<EnumValue>,
    /// Line index of the class header.
    pub source_position: usize,
}

impl ClassBlock {
    pub fn is_enum(&self) -> bool {
        self.bases
            .as_deref()
            .is_some_and(|b| b.contains("Enum") || b.contains("Flag"))
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDoc> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// A `""":class_var` documented class-level assignment.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ClassVariable {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_value: Option<String>,
    pub description: String,
}

/// A `""":field` documented `self.<name>` assignment inside a constructor.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct FunctionDoc {
    pub name: String,
    pub is_static: bool,
    /// `:param` entries, in tag order
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_description: Option<String>,
    pub body_description: String,
    /// Short call form first; long form only when a parameter has a default.
    pub definition_signatures: Vec<String>,
}

impl FunctionDoc {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Empty when the declaration carries no annotation.
    pub declared_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub description: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct EnumValue {
    pub name: String,
    pub literal_value: String,
    pub description: String,
}

/// Module-level `# comment` + assignment pair.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ModuleVariable {
    pub name: String,
    pub declared_type: String,
    pub value: String,
    pub description: String,
}

/// Rendered markup for one source file plus its heading list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDoc {
    pub text: String,
    pub headings: Vec<TocEntry>,
}

impl RenderedDoc {
    pub fn new(text: String) -> Self {
        Self {
            headings: crate::toc::toc_from_doc(&text),
            text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub heading_text: String,
    pub anchor_slug: String,
    pub level: usize,
}

/// Non-fatal diagnostics collected while assembling or merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A public function of a class with metadata appears in none of its sections.
    Uncategorized { class: String, function: String },
    /// A metadata section names a function the class does not define.
    UnknownFunction { class: String, function: String },
    /// A class name derived from a filename does not match the document.
    NameLookup {
        file: String,
        expected: String,
        found: Option<String>,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::Uncategorized { class, function } => {
                write!(f, "uncategorized function {class}.{function}()")
            }
            Warning::UnknownFunction { class, function } => {
                write!(f, "metadata lists unknown function {class}.{function}()")
            }
            Warning::NameLookup {
                file,
                expected,
                found: Some(found),
            } => write!(
                f,
                "{file}: expected class {expected} but found {found}; add an override"
            ),
            Warning::NameLookup {
                file,
                expected,
                found: None,
            } => write!(f, "{file}: class {expected} not found; add an override"),
        }
    }
}

pub const CONSTRUCTOR: &str = "__init__";
