use crate::errors::{Result, StackedError};
use crate::stack::RevisionId;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Options for submitting a patch range for review
#[derive(Debug, Default)]
pub struct SubmitOptions {
    /// Update an existing revision instead of letting the tool decide
    pub update: Option<RevisionId>,
    /// Force creation of a new revision
    pub create: bool,
    /// Re-open the editor on the revision metadata
    pub edit: bool,
}

/// The code-review collaborator. Both operations are blocking external
/// invocations; a non-zero exit aborts the enclosing operation and carries
/// the tool's exit code out of the process.
pub trait ReviewBackend {
    /// Submit or update a review for the range between `base` and the
    /// working tree's current branch.
    fn submit(&self, base: &str, opts: &SubmitOptions) -> Result<()>;

    /// Land the currently reviewed change upstream.
    fn land(&self) -> Result<()>;
}

/// Phabricator's `arc` command-line tool
pub struct ArcTool {
    program: String,
    repo_path: PathBuf,
}

impl ArcTool {
    pub fn new(program: impl Into<String>, repo_path: &Path) -> Self {
        Self {
            program: program.into(),
            repo_path: repo_path.to_path_buf(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<()> {
        tracing::debug!("Running: {} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(args)
            .current_dir(&self.repo_path)
            .status()
            .map_err(|e| {
                StackedError::config(format!("Failed to run {}: {e}", self.program))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(StackedError::external(
                self.program.clone(),
                status.code().unwrap_or(1),
            ))
        }
    }
}

impl ReviewBackend for ArcTool {
    fn submit(&self, base: &str, opts: &SubmitOptions) -> Result<()> {
        let mut args = vec!["diff".to_string()];
        if let Some(rev) = opts.update {
            args.push("--update".to_string());
            args.push(rev.to_string());
        }
        if opts.create {
            args.push("--create".to_string());
        }
        if opts.edit {
            args.push("--edit".to_string());
        }
        args.push(base.to_string());

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run(&args)
    }

    fn land(&self) -> Result<()> {
        self.run(&["land"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_nonzero_exit_carries_tool_code() {
        let tmp = TempDir::new().unwrap();
        let tool = ArcTool::new("false", tmp.path());
        let err = tool.land().unwrap_err();
        match err {
            StackedError::External { tool, code } => {
                assert_eq!(tool, "false");
                assert_eq!(code, 1);
            }
            other => panic!("expected external error, got {other}"),
        }
    }

    #[test]
    fn test_zero_exit_succeeds() {
        let tmp = TempDir::new().unwrap();
        let tool = ArcTool::new("true", tmp.path());
        assert!(tool.land().is_ok());
        assert!(tool
            .submit("main", &SubmitOptions::default())
            .is_ok());
    }

    #[test]
    fn test_missing_program_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let tool = ArcTool::new("definitely-not-a-real-tool", tmp.path());
        assert!(matches!(
            tool.land().unwrap_err(),
            StackedError::Config(_)
        ));
    }
}
