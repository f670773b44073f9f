use crate::paths;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// FileType
// ---------------------------------------------------------------------------

/// Which frontmatter envelope a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    /// `---` ... `---` at the top of the file.
    Markdown,
    /// `"""---` ... `---"""` docstring preamble.
    Source,
}

impl FileType {
    /// Detect the type from the file extension. `None` means unsupported.
    pub fn from_path(path: &Path) -> Option<FileType> {
        let ext = paths::extension(path)?;
        if paths::MARKDOWN_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileType::Markdown)
        } else if paths::SOURCE_EXTENSIONS.contains(&ext.as_str()) {
            Some(FileType::Source)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Markdown => "markdown",
            FileType::Source => "source",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FileCategory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Code,
    Data,
    Docs,
    Binary,
}

impl FileCategory {
    /// Precedence used when several categories match the same path.
    pub fn precedence() -> &'static [FileCategory] {
        &[
            FileCategory::Binary,
            FileCategory::Data,
            FileCategory::Code,
            FileCategory::Docs,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::Code => "code",
            FileCategory::Data => "data",
            FileCategory::Docs => "docs",
            FileCategory::Binary => "binary",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RequiredField
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Tags,
    Provides,
    Requires,
}

impl RequiredField {
    pub fn all() -> &'static [RequiredField] {
        &[
            RequiredField::Tags,
            RequiredField::Provides,
            RequiredField::Requires,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequiredField::Tags => "tags",
            RequiredField::Provides => "provides",
            RequiredField::Requires => "requires",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// The shape of a required field's raw YAML value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List {
        strings: Vec<String>,
        non_strings: Vec<Value>,
    },
    Other(Value),
}

impl FieldValue {
    pub fn from_yaml(value: &Value) -> FieldValue {
        match value {
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Sequence(items) => {
                let mut strings = Vec::new();
                let mut non_strings = Vec::new();
                for item in items {
                    match item {
                        Value::String(s) => strings.push(s.clone()),
                        other => non_strings.push(other.clone()),
                    }
                }
                FieldValue::List {
                    strings,
                    non_strings,
                }
            }
            other => FieldValue::Other(other.clone()),
        }
    }

    /// A list containing only strings.
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldValue::List { non_strings, .. } if non_strings.is_empty())
    }
}

/// Short human description of a YAML value, used in error messages.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("a boolean ({b})"),
        Value::Number(n) => format!("a number ({n})"),
        Value::String(s) => format!("a string ({s:?})"),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(t) => format!("a tagged value ({})", t.tag),
    }
}

/// Build a YAML sequence of strings.
pub fn string_list(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
