//! Lexical path helpers.
//!
//! Schema-set keys and destination paths are compared as strings, so every
//! path is made absolute and cleaned of `.` and `..` components first.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `..` into the preceding component.
///
/// This never touches the filesystem, so symlinks are not resolved.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root.
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Join `path` onto `base` (unless already absolute) and clean the result.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    clean(&base.join(path))
}

/// Make a path absolute against the current directory and clean it.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    Ok(clean(&std::path::absolute(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean(Path::new("./a/b/../c.ts")), PathBuf::from("a/c.ts"));
        assert_eq!(clean(Path::new("a/./b/")), PathBuf::from("a/b"));
        assert_eq!(clean(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(clean(Path::new("a/../..")), PathBuf::from(".."));
        assert_eq!(clean(Path::new("./")), PathBuf::from("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_absolute() {
        assert_eq!(clean(Path::new("/a/../../b")), PathBuf::from("/b"));
        assert_eq!(
            resolve(Path::new("/repo/app"), Path::new("../shared/schema.graphql")),
            PathBuf::from("/repo/shared/schema.graphql")
        );
        assert_eq!(
            resolve(Path::new("/repo/app"), Path::new("/abs/schema.graphql")),
            PathBuf::from("/abs/schema.graphql")
        );
    }

    #[test]
    fn test_absolute_is_absolute() {
        let path = absolute(Path::new("some/relative/../path")).unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("some/path"));
    }
}
