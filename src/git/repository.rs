use crate::errors::{Result, StackedError};
use git2::{Commit, Oid, Repository};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with the narrow set of operations the
/// stack engine needs: ref resolution, branch bookkeeping, checkout, message
/// amending, and the history relinking used after a land.
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl GitRepository {
    /// Open a Git repository at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .map_err(|e| StackedError::config(format!("Not a git repository: {e}")))?;

        let workdir = repo
            .workdir()
            .ok_or_else(|| StackedError::config("Repository has no working directory"))?
            .to_path_buf();

        Ok(Self {
            repo,
            path: workdir,
        })
    }

    /// Get repository working tree path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the current branch name (the active patch, tracked or not)
    pub fn current_branch(&self) -> Result<String> {
        let head = self
            .repo
            .head()
            .map_err(|e| StackedError::branch(format!("Could not get HEAD: {e}")))?;

        if let Some(name) = head.shorthand() {
            Ok(name.to_string())
        } else {
            // Detached HEAD - return commit hash
            let commit = head
                .peel_to_commit()
                .map_err(|e| StackedError::branch(format!("Could not get HEAD commit: {e}")))?;
            Ok(format!("HEAD@{}", commit.id()))
        }
    }

    /// Check if a local branch exists
    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, git2::BranchType::Local).is_ok()
    }

    /// List all local branches
    pub fn list_branches(&self) -> Result<Vec<String>> {
        let branches = self
            .repo
            .branches(Some(git2::BranchType::Local))
            .map_err(StackedError::Git)?;

        let mut branch_names = Vec::new();
        for branch in branches {
            let (branch, _) = branch.map_err(StackedError::Git)?;
            if let Some(name) = branch.name().map_err(StackedError::Git)? {
                branch_names.push(name.to_string());
            }
        }

        Ok(branch_names)
    }

    /// Create a new branch at the given target (current HEAD if None)
    pub fn create_branch(&self, name: &str, target: Option<&str>) -> Result<()> {
        let target_commit = if let Some(target) = target {
            self.resolve_reference(target)?
        } else {
            let head = self
                .repo
                .head()
                .map_err(|e| StackedError::branch(format!("Could not get HEAD: {e}")))?;
            head.peel_to_commit()
                .map_err(|e| StackedError::branch(format!("Could not get HEAD commit: {e}")))?
        };

        self.repo
            .branch(name, &target_commit, false)
            .map_err(|e| StackedError::branch(format!("Could not create branch '{name}': {e}")))?;

        tracing::info!("Created branch '{}'", name);
        Ok(())
    }

    /// Delete a local branch ref
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        let mut branch = self
            .repo
            .find_branch(name, git2::BranchType::Local)
            .map_err(|e| StackedError::branch(format!("Could not find branch '{name}': {e}")))?;

        branch
            .delete()
            .map_err(|e| StackedError::branch(format!("Could not delete branch '{name}': {e}")))?;

        tracing::info!("Deleted branch '{}'", name);
        Ok(())
    }

    /// Switch the working tree to a branch
    pub fn checkout_branch(&self, name: &str) -> Result<()> {
        let branch = self
            .repo
            .find_branch(name, git2::BranchType::Local)
            .map_err(|e| StackedError::branch(format!("Could not find branch '{name}': {e}")))?;

        let branch_ref = branch.get();
        let tree = branch_ref.peel_to_tree().map_err(|e| {
            StackedError::branch(format!("Could not get tree for branch '{name}': {e}"))
        })?;

        self.repo
            .checkout_tree(tree.as_object(), None)
            .map_err(|e| StackedError::branch(format!("Could not checkout branch '{name}': {e}")))?;

        self.repo
            .set_head(&format!("refs/heads/{name}"))
            .map_err(|e| StackedError::branch(format!("Could not update HEAD to '{name}': {e}")))?;

        tracing::info!("Switched to branch '{}'", name);
        Ok(())
    }

    /// Resolve a reference (branch name, tag, or commit hash) to a commit
    pub fn resolve_reference(&self, reference: &str) -> Result<Commit<'_>> {
        let obj = self.repo.revparse_single(reference).map_err(|e| {
            StackedError::branch(format!("Could not resolve reference '{reference}': {e}"))
        })?;

        obj.peel_to_commit().map_err(|e| {
            StackedError::branch(format!(
                "Reference '{reference}' does not point to a commit: {e}"
            ))
        })
    }

    /// Get the commit at the head of a branch
    pub fn branch_commit(&self, branch_name: &str) -> Result<Commit<'_>> {
        let branch = self
            .repo
            .find_branch(branch_name, git2::BranchType::Local)
            .map_err(|e| {
                StackedError::branch(format!("Could not find branch '{branch_name}': {e}"))
            })?;

        branch.get().peel_to_commit().map_err(|e| {
            StackedError::branch(format!(
                "Could not get commit for branch '{branch_name}': {e}"
            ))
        })
    }

    /// Look up a commit by id
    pub fn find_commit(&self, oid: Oid) -> Result<Commit<'_>> {
        self.repo.find_commit(oid).map_err(StackedError::Git)
    }

    /// Rewrite a branch tip's message in place. The tip commit id changes;
    /// the branch ref is moved to the amended commit.
    pub fn amend_branch_message(&self, branch: &str, message: &str) -> Result<Oid> {
        let tip = self.branch_commit(branch)?;
        let new_oid = tip
            .amend(
                Some(&format!("refs/heads/{branch}")),
                None,
                None,
                None,
                Some(message),
                None,
            )
            .map_err(|e| {
                StackedError::branch(format!("Could not amend tip of '{branch}': {e}"))
            })?;

        tracing::info!("Amended tip of '{}' -> {}", branch, new_oid);
        Ok(new_oid)
    }

    /// Move a branch ref to point at `target` without touching the working
    /// tree. Used when a patch has no commits of its own.
    pub fn reset_branch(&self, branch: &str, target: Oid) -> Result<()> {
        let mut reference = self
            .repo
            .find_reference(&format!("refs/heads/{branch}"))
            .map_err(|e| StackedError::branch(format!("Could not find branch '{branch}': {e}")))?;

        reference
            .set_target(target, "stacked: relink after land")
            .map_err(|e| StackedError::branch(format!("Could not move branch '{branch}': {e}")))?;

        tracing::info!("Reset branch '{}' to {}", branch, target);
        Ok(())
    }

    /// Rewrite the first-parent chain of `branch` from `old_root` up to its
    /// tip so that `old_root`'s first parent becomes `new_parent`. Trees,
    /// authors, and messages are preserved; every commit id in the chain
    /// changes. Returns the rewritten tip id.
    pub fn reparent_branch(&self, branch: &str, old_root: Oid, new_parent: Oid) -> Result<Oid> {
        let tip = self.branch_commit(branch)?;

        // Collect the chain tip -> old_root along first parents.
        let mut chain = Vec::new();
        let mut current = tip;
        loop {
            let reached_root = current.id() == old_root;
            chain.push(current.id());
            if reached_root {
                break;
            }
            current = current.parent(0).map_err(|_| {
                StackedError::branch(format!(
                    "Commit {old_root} is not in the first-parent history of '{branch}'"
                ))
            })?;
        }

        // Rebuild bottom-up on top of the new parent.
        let mut parent = self.find_commit(new_parent)?;
        for oid in chain.iter().rev() {
            let original = self.find_commit(*oid)?;
            let tree = original.tree().map_err(StackedError::Git)?;
            let new_oid = self
                .repo
                .commit(
                    None,
                    &original.author(),
                    &original.committer(),
                    original.message().unwrap_or(""),
                    &tree,
                    &[&parent],
                )
                .map_err(StackedError::Git)?;
            parent = self.find_commit(new_oid)?;
        }

        let new_tip = parent.id();
        let mut reference = self
            .repo
            .find_reference(&format!("refs/heads/{branch}"))
            .map_err(|e| StackedError::branch(format!("Could not find branch '{branch}': {e}")))?;
        reference
            .set_target(new_tip, "stacked: relink after land")
            .map_err(|e| StackedError::branch(format!("Could not move branch '{branch}': {e}")))?;

        tracing::info!("Reparented '{}' onto {} -> {}", branch, new_parent, new_tip);
        Ok(new_tip)
    }
}
