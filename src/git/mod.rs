pub mod repository;
pub mod shell;

pub use repository::GitRepository;

use crate::errors::{Result, StackedError};
use std::path::{Path, PathBuf};

/// Resolve the per-worktree git directory from a workdir path.
/// Handles both normal repos (.git is a directory) and worktrees (.git is a
/// file containing `gitdir: <path>`).
pub fn resolve_git_dir(workdir: &Path) -> Result<PathBuf> {
    let git_path = workdir.join(".git");
    if git_path.is_dir() {
        Ok(git_path)
    } else if git_path.is_file() {
        let content = std::fs::read_to_string(&git_path)
            .map_err(|e| StackedError::config(format!("Failed to read .git file: {e}")))?;
        let gitdir = content
            .strip_prefix("gitdir: ")
            .map(|s| s.trim())
            .ok_or_else(|| StackedError::config("Invalid .git file format"))?;
        let resolved = if Path::new(gitdir).is_absolute() {
            PathBuf::from(gitdir)
        } else {
            workdir.join(gitdir)
        };
        Ok(resolved)
    } else {
        Err(StackedError::config(format!(
            "Not a git repository: {}",
            git_path.display()
        )))
    }
}

/// Check if a directory is a Git repository
pub fn is_git_repository(path: &Path) -> bool {
    path.join(".git").exists() || git2::Repository::discover(path).is_ok()
}

/// Find the root of the Git repository containing `start_path`
pub fn find_repository_root(start_path: &Path) -> Result<PathBuf> {
    let repo = git2::Repository::discover(start_path).map_err(StackedError::Git)?;

    let workdir = repo
        .workdir()
        .ok_or_else(|| StackedError::config("Repository has no working directory (bare repo?)"))?;

    Ok(workdir.to_path_buf())
}

/// Open the repository containing the current working directory
pub fn get_current_repository() -> Result<GitRepository> {
    let current_dir = std::env::current_dir()
        .map_err(|e| StackedError::config(format!("Could not get current directory: {e}")))?;

    if !is_git_repository(&current_dir) {
        return Err(StackedError::config(format!(
            "Not in a git repository: {}",
            current_dir.display()
        )));
    }

    let repo_root = find_repository_root(&current_dir)?;
    GitRepository::open(&repo_root)
}
