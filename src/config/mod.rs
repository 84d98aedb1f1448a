pub mod settings;

pub use settings::{ReviewConfig, Settings};

use crate::errors::{Result, StackedError};
use crate::git::{resolve_git_dir, GitRepository};
use std::fs;
use std::path::PathBuf;

/// Directory for stack state under the repository's private metadata
/// directory (the per-worktree git dir)
pub fn tool_dir(repo: &GitRepository) -> Result<PathBuf> {
    Ok(resolve_git_dir(repo.path())?.join("stacked"))
}

/// Path of the stack file; its absence means the repository is not under
/// stack management
pub fn stack_file_path(repo: &GitRepository) -> Result<PathBuf> {
    Ok(tool_dir(repo)?.join("stack"))
}

/// Path of the JSON settings file
pub fn settings_path(repo: &GitRepository) -> Result<PathBuf> {
    Ok(tool_dir(repo)?.join("config.json"))
}

/// Check if a repository is initialized for stack management
pub fn is_repo_initialized(repo: &GitRepository) -> bool {
    stack_file_path(repo).map(|p| p.exists()).unwrap_or(false)
}

/// Initialize stack management: write the stack file with the root patch
/// and a default settings file
pub fn initialize_repo(repo: &GitRepository, root: &str) -> Result<()> {
    crate::stack::init_stack_file(&stack_file_path(repo)?, root)?;
    Settings::default().save_to_file(&settings_path(repo)?)?;

    tracing::info!("Initialized stack management at {}", repo.path().display());
    Ok(())
}

/// Remove all stack state so a later init starts clean
pub fn deinitialize_repo(repo: &GitRepository) -> Result<()> {
    let dir = tool_dir(repo)?;
    if !dir.exists() {
        return Err(StackedError::config("This repository was never initialized"));
    }
    fs::remove_dir_all(&dir)?;

    tracing::info!("Removed stack state at {}", dir.display());
    Ok(())
}
