//! `~` expansion for user-supplied paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` or `~/` to the home directory. Other paths are returned
/// unchanged, as is everything when no home directory is known.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(home) = dirs::home_dir() {
        if path == "~" {
            return home;
        }
        if let Some(rest) = path.strip_prefix("~/") {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Expand `name`, then anchor it under `base` unless it is already absolute.
pub fn resolve_under(base: &Path, name: &str) -> PathBuf {
    let p = expand_tilde(name);
    if p.is_absolute() { p } else { base.join(p) }
}
