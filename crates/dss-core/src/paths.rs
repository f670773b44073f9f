use std::path::{Component, Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "meta/dss_config.yml";

pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];
pub const SOURCE_EXTENSIONS: &[&str] = &["py", "pyi"];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

/// Lower-cased extension of `path`, if any.
pub fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// `path` relative to `base`, with `/` separators and no `./` prefix.
/// Absolute paths outside `base` are returned whole.
pub fn relative_slash_path(path: &Path, base: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    if rel.has_root() {
        return rel.to_string_lossy().replace('\\', "/");
    }
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// True for dot-prefixed names other than `.` and `..`.
pub fn is_hidden_name(name: &str) -> bool {
    name.starts_with('.') && name != "." && name != ".."
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
