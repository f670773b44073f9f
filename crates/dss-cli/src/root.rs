use dss_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the config file to load.
///
/// Priority:
/// 1. `--config` flag / `DSS_CONFIG` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `meta/dss_config.yml`
/// 3. None: built-in defaults apply
pub fn resolve_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = explicit {
        return Some(p.to_path_buf());
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_config_from(&cwd)
}

/// Nearest `meta/dss_config.yml` at or above `start`.
pub fn find_config_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let candidate = paths::config_path(&dir);
        if candidate.is_file() {
            return Some(candidate);
        }
        match dir.parent() {
            Some(p) => dir = p.to_path_buf(),
            None => return None,
        }
    }
}
