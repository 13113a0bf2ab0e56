//! Path resolution utilities.

use std::path::{Path, PathBuf};

/// Expands `~` to the user's home directory.
///
/// If the path starts with `~`, replaces it with the user's home directory.
/// Otherwise returns the path unchanged.
///
/// # Example
///
/// ```
/// use atelier_core::util::paths::expand_tilde;
///
/// let expanded = expand_tilde("~/site/content");
/// assert!(!expanded.starts_with("~"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}

/// Expands `~` and `$VAR`/`${VAR}` references in a configured path.
///
/// Unknown variables are left as written rather than failing, so a typo
/// surfaces later as a missing directory with the literal name in it.
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => expand_tilde(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tilde_with_tilde() {
        let path = expand_tilde("~/test/path");
        assert!(!path.starts_with("~"), "Tilde should be expanded");
        if let Some(home) = dirs::home_dir() {
            assert!(path.starts_with(&home), "Path should start with home dir");
            assert!(path.ends_with("test/path"), "Path should preserve suffix");
        }
    }

    #[test]
    fn test_expand_tilde_without_tilde() {
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_expand_tilde_relative() {
        let path = expand_tilde("relative/path");
        assert_eq!(path, PathBuf::from("relative/path"));
    }

    #[test]
    fn test_expand_path_plain() {
        assert_eq!(expand_path("/srv/content"), PathBuf::from("/srv/content"));
    }

    #[test]
    fn test_expand_path_unknown_variable_falls_back() {
        let path = expand_path("/srv/$ATELIER_SURELY_UNSET_VARIABLE/content");
        assert_eq!(
            path,
            PathBuf::from("/srv/$ATELIER_SURELY_UNSET_VARIABLE/content")
        );
    }

    #[test]
    fn test_expand_path_tilde() {
        let path = expand_path("~/content");
        assert!(!path.starts_with("~"));
    }
}
