use crate::error::{DssError, Result};
use crate::frontmatter::Frontmatter;
use crate::types::{FileCategory, RequiredField};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// FrontmatterDefaults
// ---------------------------------------------------------------------------

/// Values filled in for missing or unusable required fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontmatterDefaults {
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub provides: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
}

fn default_tags() -> Vec<String> {
    vec!["draft".to_string()]
}

impl Default for FrontmatterDefaults {
    fn default() -> Self {
        Self {
            tags: default_tags(),
            provides: Vec::new(),
            requires: Vec::new(),
        }
    }
}

impl FrontmatterDefaults {
    pub fn get(&self, field: RequiredField) -> &[String] {
        match field {
            RequiredField::Tags => &self.tags,
            RequiredField::Provides => &self.provides,
            RequiredField::Requires => &self.requires,
        }
    }

    /// The minimal valid block: the three required fields, nothing else.
    pub fn to_frontmatter(&self) -> Frontmatter {
        let mut fm = Frontmatter::new();
        for &field in RequiredField::all() {
            fm.set_list(field, self.get(field));
        }
        fm
    }
}

// ---------------------------------------------------------------------------
// FrontmatterTemplate
// ---------------------------------------------------------------------------

/// Frontmatter injected into a file of a given category that has none.
/// Unset required fields fall back to the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontmatterTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provides: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Vec<String>>,
    /// Additional keys such as `status: draft`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FrontmatterTemplate {
    fn get(&self, field: RequiredField) -> Option<&Vec<String>> {
        match field {
            RequiredField::Tags => self.tags.as_ref(),
            RequiredField::Provides => self.provides.as_ref(),
            RequiredField::Requires => self.requires.as_ref(),
        }
    }

    pub fn render(&self, defaults: &FrontmatterDefaults) -> Frontmatter {
        let mut fm = Frontmatter::new();
        for &field in RequiredField::all() {
            let items = self.get(field).map(|v| v.as_slice());
            fm.set_list(field, items.unwrap_or_else(|| defaults.get(field)));
        }
        for (key, value) in &self.extra {
            fm.insert(key, value.clone());
        }
        fm
    }
}

// ---------------------------------------------------------------------------
// Classification rules
// ---------------------------------------------------------------------------

fn globs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_classification() -> BTreeMap<FileCategory, Vec<String>> {
    let mut m = BTreeMap::new();
    m.insert(
        FileCategory::Code,
        globs(&["**/*.py", "**/*.js", "**/*.ts", "**/src/**", "**/lib/**"]),
    );
    m.insert(
        FileCategory::Data,
        globs(&["**/*.csv", "**/*.parquet", "**/*.json", "**/data/**"]),
    );
    m.insert(
        FileCategory::Docs,
        globs(&["**/*.md", "**/*.markdown", "**/*.rst", "**/docs/**"]),
    );
    m.insert(
        FileCategory::Binary,
        globs(&[
            "**/*.png", "**/*.jpg", "**/*.jpeg", "**/*.gif", "**/*.pdf", "**/*.zip", "**/*.bin",
        ]),
    );
    m
}

fn default_ignore() -> Vec<String> {
    globs(&["**/node_modules/**", "**/__pycache__/**"])
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

/// Linter configuration. Loaded once at start-up and passed by reference,
/// read-only, to every operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: FrontmatterDefaults,
    #[serde(default = "default_classification")]
    pub classification: BTreeMap<FileCategory, Vec<String>>,
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub templates: BTreeMap<FileCategory, FrontmatterTemplate>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: FrontmatterDefaults::default(),
            classification: default_classification(),
            ignore: default_ignore(),
            templates: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DssError::ConfigNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml(&data)
    }

    /// Parse a config document. An empty document yields the defaults.
    pub fn from_yaml(data: &str) -> Result<Self> {
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(data)?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Frontmatter to inject into a file of `category` that has none.
    pub fn injection_frontmatter(&self, category: Option<FileCategory>) -> Frontmatter {
        match category.and_then(|c| self.templates.get(&c)) {
            Some(template) => template.render(&self.defaults),
            None => self.defaults.to_frontmatter(),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        // 1. Every glob must compile
        let classified = self
            .classification
            .iter()
            .flat_map(|(cat, globs)| globs.iter().map(move |g| (cat.as_str(), g)));
        let ignored = self.ignore.iter().map(|g| ("ignore", g));
        for (section, pattern) in classified.chain(ignored) {
            if let Err(e) = glob::Pattern::new(pattern) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("invalid glob '{pattern}' in {section}: {}", e.msg),
                });
            }
        }

        // 2. Empty default tags produce frontmatter nobody can search by
        if self.defaults.tags.is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "defaults.tags is empty; injected frontmatter will carry no tags"
                    .to_string(),
            });
        }

        warnings
    }

    pub fn has_errors(warnings: &[ConfigWarning]) -> bool {
        warnings.iter().any(|w| w.level == WarnLevel::Error)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
