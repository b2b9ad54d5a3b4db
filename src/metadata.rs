//! Per-class section metadata: which functions go in which named section,
//! in which order.
//!
//! The on-disk form is JSON keyed by class, then by section, with section
//! order taken from the file:
//!
//! ```json
//! {
//!   "Widget": {
//!     "Constructor": { "functions": ["__init__"] },
//!     "Sizing": { "description": "Change the size.", "functions": ["resize"] },
//!     "Ignore": { "functions": ["debug_dump"] }
//!   }
//! }
//! ```

use crate::error::MetadataError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Section whose functions are dropped from output.
pub const IGNORE: &str = "Ignore";
/// Section rendered without a heading.
pub const CONSTRUCTOR_SECTION: &str = "Constructor";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub description: String,
    pub function_names: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>, description: impl Into<String>, functions: &[&str]) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            function_names: functions.iter().map(|f| f.to_string()).collect(),
        }
    }

    pub fn is_ignore(&self) -> bool {
        self.name == IGNORE
    }

    pub fn has_heading(&self) -> bool {
        self.name != CONSTRUCTOR_SECTION
    }
}

#[derive(Deserialize)]
struct RawSection {
    #[serde(default)]
    description: String,
    functions: Vec<String>,
}

/// Validated mapping of class name to its ordered sections. Read-only once
/// built; shared by reference across files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataSpec {
    classes: HashMap<String, Vec<Section>>,
}

impl MetadataSpec {
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        let root: Map<String, Value> = serde_json::from_str(text)?;
        let mut spec = Self::default();
        for (class, value) in root {
            let Value::Object(sections) = value else {
                return Err(MetadataError::NotAnObject { class });
            };
            let mut parsed = Vec::with_capacity(sections.len());
            for (name, body) in sections {
                let raw: RawSection =
                    serde_json::from_value(body).map_err(|source| MetadataError::Section {
                        class: class.clone(),
                        section: name.clone(),
                        source,
                    })?;
                parsed.push(Section {
                    name,
                    description: raw.description,
                    function_names: raw.functions,
                });
            }
            spec.insert(class, parsed)?;
        }
        Ok(spec)
    }

    /// Add a class entry, rejecting a function listed in two sections.
    pub fn insert(
        &mut self,
        class: impl Into<String>,
        sections: Vec<Section>,
    ) -> Result<(), MetadataError> {
        let class = class.into();
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for section in &sections {
            for function in &section.function_names {
                if let Some(first) = seen.insert(function.as_str(), section.name.as_str()) {
                    return Err(MetadataError::DuplicateFunction {
                        class,
                        function: function.clone(),
                        first: first.to_string(),
                        second: section.name.clone(),
                    });
                }
            }
        }
        self.classes.insert(class, sections);
        Ok(())
    }

    pub fn sections(&self, class: &str) -> Option<&[Section]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
