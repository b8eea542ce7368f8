//! Project root detection and data directory resolution.
//!
//! Walks upward from the current directory looking for a marker file, the
//! same heuristic a dependency manager or VCS client uses to find the top of
//! a workspace. Environment variables, when set, always win over detection.

use std::path::{Path, PathBuf};

const MARKERS: [&str; 7] = [
    ".engram_project",
    ".git",
    "pyproject.toml",
    "package.json",
    "Cargo.toml",
    "go.mod",
    "CMakeLists.txt",
];

const MAX_DEPTH: usize = 10;

/// Walk from `start` up to `MAX_DEPTH` ancestors, returning the first
/// directory containing any marker, checked in priority order at each level.
pub fn detect_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    for _ in 0..MAX_DEPTH {
        if MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            return Some(dir);
        }
        match dir.parent() {
            Some(parent) => dir = parent.to_path_buf(),
            None => return None,
        }
    }
    None
}

/// Resolved data directories for both scopes.
#[derive(Debug, Clone)]
pub struct ScopePaths {
    pub project_dir: PathBuf,
    pub user_dir: PathBuf,
}

fn user_data_root() -> PathBuf {
    directories::ProjectDirs::from("dev", "engram", "engram")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".engram"))
}

/// Resolve both scope directories.
///
/// Precedence, highest first: `ENGRAM_PROJECT_DATA_DIR` /
/// `ENGRAM_USER_DATA_DIR`, then a `--data-dir` CLI override (project/user
/// subdirectories under it), then `ENGRAM_PROJECT_ROOT` combined with a
/// `.engram` directory under it (falling back to [`detect_project_root`]
/// from the current directory), then the platform data directory.
pub fn resolve_scope_paths(cli_data_dir: Option<&Path>) -> ScopePaths {
    let user_dir = std::env::var("ENGRAM_USER_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| cli_data_dir.map(|d| d.join("user")))
        .unwrap_or_else(|| user_data_root().join("user"));

    let project_dir = std::env::var("ENGRAM_PROJECT_DATA_DIR")
        .ok()
        .map(PathBuf::from)
        .or_else(|| cli_data_dir.map(|d| d.join("project")))
        .unwrap_or_else(|| {
            let root = std::env::var("ENGRAM_PROJECT_ROOT")
                .ok()
                .map(PathBuf::from)
                .or_else(|| std::env::current_dir().ok().and_then(|cwd| detect_project_root(&cwd)))
                .or_else(|| std::env::current_dir().ok())
                .unwrap_or_else(|| PathBuf::from("."));
            root.join(".engram")
        });

    ScopePaths { project_dir, user_dir }
}
