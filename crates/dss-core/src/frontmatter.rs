use crate::types::{describe, string_list, FieldValue, FileType, RequiredField};
use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Frontmatter
// ---------------------------------------------------------------------------

/// An ordered frontmatter mapping. Keys other than the required ones are
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: Mapping,
}

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_mapping(fields: Mapping) -> Self {
        Self { fields }
    }

    pub fn mapping(&self) -> &Mapping {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Insert or replace `key`. Replacing keeps the key's position.
    pub fn insert(&mut self, key: &str, value: Value) {
        self.fields.insert(Value::String(key.to_string()), value);
    }

    pub fn field(&self, field: RequiredField) -> Option<FieldValue> {
        self.get(field.as_str()).map(FieldValue::from_yaml)
    }

    pub fn set_list(&mut self, field: RequiredField, items: &[String]) {
        self.insert(field.as_str(), string_list(items));
    }

    /// The string items of a required field, ignoring anything else.
    pub fn strings(&self, field: RequiredField) -> Vec<String> {
        match self.field(field) {
            Some(FieldValue::List { strings, .. }) => strings,
            Some(FieldValue::Text(s)) => vec![s],
            _ => Vec::new(),
        }
    }

    pub fn tags(&self) -> Vec<String> {
        self.strings(RequiredField::Tags)
    }

    pub fn provides(&self) -> Vec<String> {
        self.strings(RequiredField::Provides)
    }

    pub fn requires(&self) -> Vec<String> {
        self.strings(RequiredField::Requires)
    }

    pub fn status(&self) -> Option<String> {
        self.get("status").and_then(scalar_text)
    }

    pub fn priority(&self) -> Option<String> {
        self.get("priority").and_then(scalar_text)
    }

    pub fn version(&self) -> Option<String> {
        self.get("version").and_then(scalar_text)
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// A frontmatter block located inside a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// Byte offset just past the closing delimiter and its terminator.
    pub end: usize,
    /// Raw YAML between the delimiters.
    pub yaml: String,
    /// What followed the closing `---`: a line ending, `"""`, or nothing.
    pub terminator: String,
}

static MARKDOWN_RE: OnceLock<Regex> = OnceLock::new();
static SOURCE_RE: OnceLock<Regex> = OnceLock::new();
static PREAMBLE_RE: OnceLock<Regex> = OnceLock::new();

fn markdown_re() -> &'static Regex {
    MARKDOWN_RE.get_or_init(|| {
        Regex::new(r"(?s)\A(\x{FEFF})?---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*(\r?\n|\z)").unwrap()
    })
}

fn source_re() -> &'static Regex {
    SOURCE_RE.get_or_init(|| {
        Regex::new(
            r#"(?s)\A((?:[ \t]*(?:#[^\n]*)?\r?\n)*)"""---[ \t]*\r?\n(?:(.*?)\r?\n)?---[ \t]*("""|\r?\n|\z)"#,
        )
        .unwrap()
    })
}

fn preamble_re() -> &'static Regex {
    PREAMBLE_RE.get_or_init(|| Regex::new(r"\A(?:#[^\n]*(?:\n|\z))*").unwrap())
}

/// Byte length of the leading `#` lines of a source file (shebang,
/// encoding declaration). A new block goes after them.
pub fn source_preamble_len(content: &str) -> usize {
    preamble_re().find(content).map_or(0, |m| m.end())
}

/// Locate the frontmatter block of `content`.
///
/// Returns `None` when the file does not start with the envelope for
/// `file_type`, including when the opening delimiter is never closed.
pub fn extract(content: &str, file_type: FileType) -> Option<ExtractedBlock> {
    let re = match file_type {
        FileType::Markdown => markdown_re(),
        FileType::Source => source_re(),
    };
    let caps = re.captures(content)?;
    let whole = caps.get(0)?;
    let start = caps.get(1).map(|m| m.end()).unwrap_or(whole.start());
    Some(ExtractedBlock {
        start,
        end: whole.end(),
        yaml: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
        terminator: caps
            .get(3)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default(),
    })
}

/// Parse the YAML body of a block. An empty body is an empty mapping.
pub fn parse(yaml: &str) -> Result<Frontmatter, String> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::new());
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Mapping(fields)) => Ok(Frontmatter::from_mapping(fields)),
        Ok(Value::Null) => Ok(Frontmatter::new()),
        Ok(other) => Err(format!(
            "frontmatter must be a mapping, found {}",
            describe(&other)
        )),
        Err(e) => Err(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
