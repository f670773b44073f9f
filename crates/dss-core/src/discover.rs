use crate::classifier::Classifier;
use crate::paths;
use crate::types::FileType;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && paths::is_hidden_name(&entry.file_name().to_string_lossy())
}

/// An input or directory entry that could not be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Files to process plus the inputs that could not be reached. Failures are
/// reported per path and never stop the rest of the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub failures: Vec<DiscoveryFailure>,
}

/// Collect the files to process from the command-line `inputs`.
///
/// Files named explicitly are always kept. Directories contribute their
/// supported files, top level only unless `recursive`. Hidden entries are
/// not descended into and ignored paths are dropped. The file list is
/// sorted and free of duplicates.
pub fn discover(inputs: &[PathBuf], recursive: bool, classifier: &Classifier) -> Discovery {
    let mut found = BTreeSet::new();
    let mut failures = Vec::new();

    for input in inputs {
        if input.is_file() {
            found.insert(input.clone());
            continue;
        }
        if !input.is_dir() {
            warn!(path = %input.display(), "path not found");
            failures.push(DiscoveryFailure {
                path: input.clone(),
                message: "path not found".to_string(),
            });
            continue;
        }

        let mut walker = WalkDir::new(input).follow_links(false);
        if !recursive {
            walker = walker.max_depth(1);
        }
        for entry in walker.into_iter().filter_entry(|e| !is_hidden(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| input.clone());
                    warn!(path = %path.display(), error = %e, "cannot walk");
                    failures.push(DiscoveryFailure {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if FileType::from_path(path).is_none() {
                continue;
            }
            let rel = paths::relative_slash_path(path, input);
            if classifier.is_ignored(&rel) {
                debug!(path = %path.display(), "ignored by config");
                continue;
            }
            found.insert(path.to_path_buf());
        }
    }

    Discovery {
        files: found.into_iter().collect(),
        failures,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x").unwrap();
    }

    fn names(files: &[PathBuf], base: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| paths::relative_slash_path(f, base))
            .collect()
    }

    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), "tool.py");
        touch(dir.path(), "data.csv");
        touch(dir.path(), "docs/guide.md");
        touch(dir.path(), ".git/notes.md");
        touch(dir.path(), "node_modules/pkg/readme.md");
        dir
    }

    #[test]
    fn top_level_only_without_recursive() {
        let dir = fixture();
        let c = Classifier::new(&Config::default()).unwrap();
        let found = discover(&[dir.path().to_path_buf()], false, &c);
        assert_eq!(names(&found.files, dir.path()), vec!["README.md", "tool.py"]);
        assert!(found.failures.is_empty());
    }

    #[test]
    fn recursive_skips_hidden_and_ignored() {
        let dir = fixture();
        let c = Classifier::new(&Config::default()).unwrap();
        let found = discover(&[dir.path().to_path_buf()], true, &c);
        assert_eq!(
            names(&found.files, dir.path()),
            vec!["README.md", "docs/guide.md", "tool.py"]
        );
    }

    #[test]
    fn explicit_files_are_kept_and_deduplicated() {
        let dir = fixture();
        let c = Classifier::new(&Config::default()).unwrap();
        let readme = dir.path().join("README.md");
        let csv = dir.path().join("data.csv");
        let found = discover(&[readme.clone(), csv.clone(), readme.clone()], false, &c);
        assert_eq!(found.files, vec![readme, csv]);
    }

    #[test]
    fn missing_input_is_recorded_and_the_rest_continue() {
        let dir = fixture();
        let c = Classifier::new(&Config::default()).unwrap();
        let missing = dir.path().join("nope.md");
        let readme = dir.path().join("README.md");
        let found = discover(&[missing.clone(), readme.clone(), dir.path().join("docs")], false, &c);

        assert_eq!(found.files, vec![readme, dir.path().join("docs/guide.md")]);
        assert_eq!(
            found.failures,
            vec![DiscoveryFailure {
                path: missing,
                message: "path not found".to_string(),
            }]
        );
    }
}
