use crate::config::Config;
use crate::error::{DssError, Result};
use crate::types::FileCategory;
use glob::Pattern;

fn compile(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(|e| DssError::InvalidGlob {
        pattern: pattern.to_string(),
        reason: e.msg.to_string(),
    })
}

/// Glob rules from the config, compiled once per run.
pub struct Classifier {
    categories: Vec<(FileCategory, Vec<Pattern>)>,
    ignore: Vec<Pattern>,
}

impl Classifier {
    pub fn new(config: &Config) -> Result<Self> {
        let mut categories = Vec::new();
        for &category in FileCategory::precedence() {
            let patterns = config
                .classification
                .get(&category)
                .map(|globs| globs.iter().map(|g| compile(g)).collect::<Result<Vec<_>>>())
                .transpose()?
                .unwrap_or_default();
            categories.push((category, patterns));
        }
        let ignore = config
            .ignore
            .iter()
            .map(|g| compile(g))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { categories, ignore })
    }

    /// First matching category in precedence order. `rel_path` uses `/`.
    pub fn classify(&self, rel_path: &str) -> Option<FileCategory> {
        self.categories
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.matches(rel_path)))
            .map(|(category, _)| *category)
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(rel_path))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
