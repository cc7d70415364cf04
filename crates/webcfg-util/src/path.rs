//! Lexical path helpers with Node `path` semantics.
//!
//! Nothing here touches the filesystem: paths are computed, never checked.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` at the root is dropped; leading `..` in a relative path is kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Resolve `path` against `base` like Node's `path.resolve(base, path)`.
///
/// An absolute `path` replaces `base` entirely.
#[must_use]
pub fn resolve(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    normalize(&base.join(path))
}

/// Concatenate `path` onto `base` like Node's `path.join(base, path)`.
///
/// Unlike [`Path::join`], a leading root on `path` does not replace `base`.
#[must_use]
pub fn join(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let relative: PathBuf = path
        .as_ref()
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    normalize(&base.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_dots() {
        assert_eq!(
            normalize(Path::new("/ws/./apps/../libs/ui")),
            PathBuf::from("/ws/libs/ui")
        );
    }

    #[test]
    fn test_normalize_parent_at_root() {
        assert_eq!(normalize(Path::new("/../ws")), PathBuf::from("/ws"));
    }

    #[test]
    fn test_normalize_keeps_leading_parent() {
        assert_eq!(normalize(Path::new("../a/./b")), PathBuf::from("../a/b"));
        assert_eq!(normalize(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve(Path::new("/ws"), "shared/styles"),
            PathBuf::from("/ws/shared/styles")
        );
        assert_eq!(
            resolve(Path::new("/ws"), "./shared/../styles"),
            PathBuf::from("/ws/styles")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_absolute_wins() {
        assert_eq!(
            resolve(Path::new("/ws"), "/opt/styles"),
            PathBuf::from("/opt/styles")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_join_ignores_leading_root() {
        assert_eq!(
            join(Path::new("/ws"), "/apps/shop/src/index.html"),
            PathBuf::from("/ws/apps/shop/src/index.html")
        );
        assert_eq!(
            join(Path::new("/ws"), "apps/shop"),
            PathBuf::from("/ws/apps/shop")
        );
    }
}
