//! Configuration root discovery and path anchors.
//!
//! Responsibilities:
//! - Find the project root by walking ancestor directories for a marker.
//! - Provide the platform fallback location when no marker is found.
//! - Derive the anchors used by placement modes (volume root, the directory
//!   above the project root).
//!
//! Invariants:
//! - `find_root` is pure over the filesystem: no process state is consulted,
//!   so it is unit-testable against a synthetic directory tree.

use std::path::{Component, Path, PathBuf};

use crate::constants::APP_DIR_NAME;

/// Walk ancestors of `start_dir` (including itself, bounded by
/// `max_levels`) until a directory containing `marker_relative_path`
/// is found.
pub fn find_root(start_dir: &Path, marker_relative_path: &Path, max_levels: usize) -> Option<PathBuf> {
    let mut current = Some(start_dir);
    for _ in 0..=max_levels {
        let dir = current?;
        if dir.join(marker_relative_path).exists() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}

/// Platform-appropriate fallback config directory, used when no marker is
/// found within the search bound.
pub(crate) fn fallback_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_DIR_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// The filesystem root of the drive/volume containing `path`.
///
/// On Unix this is `/`; on Windows it is the drive prefix plus the root
/// separator (`C:\`).
pub fn volume_root(path: &Path) -> PathBuf {
    let mut root = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(prefix) => root.push(prefix.as_os_str()),
            Component::RootDir => {
                root.push(std::path::MAIN_SEPARATOR_STR);
                break;
            }
            _ => break,
        }
    }
    if root.as_os_str().is_empty() {
        root.push(std::path::MAIN_SEPARATOR_STR);
    }
    root
}

/// The directory one level above the project root, used for data that
/// lives alongside, not inside, the project checkout.
pub fn above_project_root(project_root: &Path) -> PathBuf {
    project_root
        .parent()
        .map_or_else(|| project_root.to_path_buf(), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_root_from_nested_start() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        let nested = root.join("src").join("jobs");
        fs::create_dir_all(root.join("config")).unwrap();
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("config/app_config.yaml"), "x: 1\n").unwrap();

        let marker = Path::new("config/app_config.yaml");
        assert_eq!(find_root(&nested, marker, 10), Some(root.clone()));
        // The root itself also matches.
        assert_eq!(find_root(&root, marker, 10), Some(root));
    }

    #[test]
    fn test_find_root_respects_level_bound() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        let deep = root.join("a/b/c/d");
        fs::create_dir_all(root.join("config")).unwrap();
        fs::create_dir_all(&deep).unwrap();
        fs::write(root.join("config/app_config.yaml"), "x: 1\n").unwrap();

        let marker = Path::new("config/app_config.yaml");
        assert!(find_root(&deep, marker, 2).is_none());
        assert_eq!(find_root(&deep, marker, 4), Some(root));
    }

    #[test]
    fn test_find_root_missing_marker() {
        let tmp = TempDir::new().unwrap();
        let marker = Path::new("config/app_config.yaml");
        assert!(find_root(tmp.path(), marker, 3).is_none());
    }

    #[test]
    fn test_volume_root_of_absolute_path() {
        let tmp = TempDir::new().unwrap();
        let root = volume_root(tmp.path());
        assert!(root.is_absolute());
        assert!(tmp.path().starts_with(&root));
    }

    #[test]
    fn test_above_project_root_is_parent() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        assert_eq!(above_project_root(&project), tmp.path());
    }
}
