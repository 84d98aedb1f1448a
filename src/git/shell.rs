use crate::errors::{Result, StackedError};
use std::path::Path;
use std::process::Command;

/// Run a `git` porcelain command in the repository working tree, inheriting
/// stdio so the user sees git's own output. Non-zero exit is surfaced as an
/// external tool failure carrying git's exit code.
pub fn run_git(repo_path: &Path, args: &[&str]) -> Result<()> {
    tracing::debug!("Running: git {}", args.join(" "));

    let status = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .status()
        .map_err(|e| StackedError::config(format!("Failed to run git: {e}")))?;

    if status.success() {
        Ok(())
    } else {
        Err(StackedError::external("git", status.code().unwrap_or(1)))
    }
}

/// Rebase the current branch onto `onto`, fork-point aware so history that
/// diverges only by the checkout itself is not replayed.
pub fn rebase_onto(repo_path: &Path, onto: &str) -> Result<()> {
    run_git(repo_path, &["rebase", "--fork-point", onto])
}

/// Show the diff of the current patch against its predecessor's tip
pub fn diff_against(repo_path: &Path, base: &str) -> Result<()> {
    run_git(repo_path, &["diff", &format!("{base}...HEAD")])
}

/// Show the log of commits unique to the current patch
pub fn log_against(repo_path: &Path, base: &str) -> Result<()> {
    run_git(repo_path, &["log", &format!("{base}..HEAD")])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_git_failure_carries_exit_code() {
        let tmp = TempDir::new().unwrap();
        // Not a repository, so any porcelain command fails.
        let err = run_git(tmp.path(), &["log"]).unwrap_err();
        match err {
            StackedError::External { tool, code } => {
                assert_eq!(tool, "git");
                assert_ne!(code, 0);
            }
            other => panic!("expected external error, got {other}"),
        }
    }
}
