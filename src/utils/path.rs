//! Lexical path resolution.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base` into an absolute, normalised path.
///
/// An absolute `path` ignores `base`. `.` components are removed and `..`
/// removes the preceding component; the filesystem is never consulted, so
/// symlinks are not followed and the result need not exist.
///
/// # Examples
///
/// ```
/// # use std::path::{Path, PathBuf};
/// # use dir_usage::utils::resolve_against;
/// let resolved = resolve_against(Path::new("/work"), Path::new("sub/../dir"));
/// assert_eq!(resolved, PathBuf::from("/work/dir"));
/// ```
#[must_use]
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    let joined = base.join(path);
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `pop` refuses to remove the root, so `/..` stays `/`
                resolved.pop();
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                resolved.push(component.as_os_str());
            }
        }
    }

    if resolved.as_os_str().is_empty() {
        resolved.push(Component::CurDir.as_os_str());
    }
    resolved
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_joined_onto_base() {
        assert_eq!(
            resolve_against(Path::new("/work"), Path::new("sub/dir")),
            PathBuf::from("/work/sub/dir")
        );
    }

    #[test]
    fn test_current_dir_resolves_to_base() {
        assert_eq!(
            resolve_against(Path::new("/work/project"), Path::new(".")),
            PathBuf::from("/work/project")
        );
    }

    #[test]
    fn test_parent_components_are_collapsed() {
        assert_eq!(
            resolve_against(Path::new("/work/project"), Path::new("../other/./x")),
            PathBuf::from("/work/other/x")
        );
        assert_eq!(
            resolve_against(Path::new("/"), Path::new("../../etc")),
            PathBuf::from("/etc")
        );
    }

    #[test]
    fn test_absolute_path_ignores_base() {
        assert_eq!(
            resolve_against(Path::new("/work"), Path::new("/var/log/")),
            PathBuf::from("/var/log")
        );
    }
}
