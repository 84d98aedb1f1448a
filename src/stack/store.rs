use crate::errors::{Result, StackedError};
use std::fs;
use std::path::{Path, PathBuf};

/// The ordered stack of tracked patch names. Index 0 is the root (the
/// integration branch); later indices are increasingly newer patches, each
/// rebased onto its predecessor.
///
/// The stack is an explicit handle: loaded once at command entry, passed to
/// every operation, and written back by each mutating operation. It is
/// persisted one name per line in the stack file under the repository's
/// private metadata directory.
#[derive(Debug)]
pub struct PatchStack {
    path: PathBuf,
    patches: Vec<String>,
}

impl PatchStack {
    /// Load the stack from its file. Blank lines are ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StackedError::state(format!(
                "Could not read stack file {}: {e}",
                path.display()
            ))
        })?;

        let patches = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            patches,
        })
    }

    /// Rewrite the stack file, one name per line. A missing file means the
    /// repository was deinitialized mid-run; that is a hard failure.
    pub fn save(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(StackedError::state(format!(
                "Stack file {} does not exist",
                self.path.display()
            )));
        }

        let mut content = String::new();
        for patch in &self.patches {
            content.push_str(patch);
            content.push('\n');
        }
        fs::write(&self.path, content)?;

        tracing::debug!("Saved stack ({} patches)", self.patches.len());
        Ok(())
    }

    /// Index of a patch name, None if not tracked
    pub fn find(&self, name: &str) -> Option<usize> {
        self.patches.iter().position(|patch| patch == name)
    }

    pub fn patches(&self) -> &[String] {
        &self.patches
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// The root patch (bottom of the stack)
    pub fn root(&self) -> Option<&str> {
        self.patches.first().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.patches.get(index).map(String::as_str)
    }

    /// Insert a new patch name directly after `index`
    pub fn insert_after(&mut self, index: usize, name: String) {
        self.patches.insert(index + 1, name);
    }

    /// Remove the patch at `index`, returning its name
    pub fn remove(&mut self, index: usize) -> String {
        self.patches.remove(index)
    }
}

/// Create the stack file with the root patch as its only entry
pub fn init_stack_file(path: &Path, root: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, format!("{root}\n"))?;
    tracing::info!("Initialized stack with root '{}'", root);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn stack_with(names: &[&str]) -> (TempDir, PatchStack) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stack");
        let content: String = names.iter().map(|n| format!("{n}\n")).collect();
        fs::write(&path, content).unwrap();
        let stack = PatchStack::load(&path).unwrap();
        (tmp, stack)
    }

    #[test]
    fn test_round_trip() {
        let (_tmp, mut stack) = stack_with(&["main", "featureA"]);
        stack.insert_after(1, "featureB".to_string());
        stack.save().unwrap();

        let reloaded = PatchStack::load(&stack.path).unwrap();
        assert_eq!(reloaded.patches(), &["main", "featureA", "featureB"]);
    }

    #[test]
    fn test_find_returns_index_or_none() {
        let (_tmp, stack) = stack_with(&["main", "featureA"]);
        assert_eq!(stack.find("main"), Some(0));
        assert_eq!(stack.find("featureA"), Some(1));
        assert_eq!(stack.find("featureB"), None);
    }

    #[test]
    fn test_blank_lines_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stack");
        fs::write(&path, "main\n\nfeatureA\n").unwrap();
        let stack = PatchStack::load(&path).unwrap();
        assert_eq!(stack.patches(), &["main", "featureA"]);
    }

    #[test]
    fn test_save_fails_when_file_missing() {
        let (tmp, stack) = stack_with(&["main"]);
        fs::remove_file(tmp.path().join("stack")).unwrap();
        let err = stack.save().unwrap_err();
        assert!(matches!(err, StackedError::State(_)));
    }

    #[test]
    fn test_init_stack_file_writes_root() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stacked").join("stack");
        init_stack_file(&path, "main").unwrap();
        let stack = PatchStack::load(&path).unwrap();
        assert_eq!(stack.patches(), &["main"]);
        assert_eq!(stack.root(), Some("main"));
    }
}
