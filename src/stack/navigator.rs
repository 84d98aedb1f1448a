use crate::cli::output::Output;
use crate::errors::{Result, StackedError};
use crate::git::{shell, GitRepository};
use crate::stack::PatchStack;

/// Push/pop/untrack navigation over the patch stack. Every operation is a
/// precondition check followed by a single mutating action; ordinary
/// precondition violations print a message and return cleanly, only
/// state corruption is a hard failure.
pub struct Navigator<'a> {
    repo: &'a GitRepository,
    stack: &'a mut PatchStack,
}

impl<'a> Navigator<'a> {
    pub fn new(repo: &'a GitRepository, stack: &'a mut PatchStack) -> Self {
        Self { repo, stack }
    }

    fn patch_at(&self, index: usize) -> Result<String> {
        self.stack
            .get(index)
            .map(str::to_string)
            .ok_or_else(|| StackedError::state(format!("No patch at index {index}")))
    }

    /// Move the working position down the stack. Never rebases.
    pub fn pop(&mut self, all: bool) -> Result<()> {
        let current = self.repo.current_branch()?;
        match self.stack.find(&current) {
            None => {
                Output::warning(format!("Cannot pop: '{current}' is not tracked in the stack"));
            }
            Some(0) => {
                Output::warning("Cannot pop: already at bottom of stack");
            }
            Some(index) => {
                let target = if all { 0 } else { index - 1 };
                let name = self.patch_at(target)?;
                self.repo.checkout_branch(&name)?;
            }
        }
        Ok(())
    }

    /// Move to the next patch up the stack, rebasing it onto the patch that
    /// was active before the checkout.
    pub fn push_one(&mut self, rebase: bool) -> Result<()> {
        let current = self.repo.current_branch()?;
        match self.stack.find(&current) {
            None => {
                Output::warning(format!(
                    "Cannot push: '{current}' is not tracked in the stack"
                ));
            }
            Some(index) if index + 1 == self.stack.len() => {
                Output::warning("Cannot push: no more patches in the stack");
            }
            Some(index) => {
                let next = self.patch_at(index + 1)?;
                self.repo.checkout_branch(&next)?;
                if rebase {
                    shell::rebase_onto(self.repo.path(), &current)?;
                }
            }
        }
        Ok(())
    }

    /// Track an existing branch directly above the current patch and move
    /// to it, rebasing it onto the previously active patch.
    pub fn push_existing(&mut self, name: &str, rebase: bool) -> Result<()> {
        let current = self.repo.current_branch()?;
        match (self.stack.find(&current), self.stack.find(name)) {
            (None, _) => {
                Output::warning(format!(
                    "Cannot push: '{current}' is not tracked in the stack"
                ));
            }
            (_, Some(_)) => {
                Output::warning(format!("Cannot push '{name}': already in the stack"));
            }
            (Some(index), None) => {
                if !self.repo.branch_exists(name) {
                    Output::warning(format!("Cannot push '{name}': no such local branch"));
                    return Ok(());
                }
                self.stack.insert_after(index, name.to_string());
                self.stack.save()?;
                self.repo.checkout_branch(name)?;
                if rebase {
                    shell::rebase_onto(self.repo.path(), &current)?;
                }
            }
        }
        Ok(())
    }

    /// Create a new branch at the current patch's tip, track it directly
    /// above, and move to it. The branch starts exactly at its parent's tip,
    /// so no rebase is needed.
    pub fn push_new(&mut self, name: &str) -> Result<()> {
        let current = self.repo.current_branch()?;
        match (self.stack.find(&current), self.stack.find(name)) {
            (None, _) => {
                Output::warning(format!(
                    "Cannot push: '{current}' is not tracked in the stack"
                ));
            }
            (_, Some(_)) => {
                Output::warning(format!("Cannot push '{name}': already in the stack"));
            }
            (Some(index), None) => {
                // Branch creation happens-before the insertion is persisted.
                self.repo.create_branch(name, Some(&current))?;
                self.stack.insert_after(index, name.to_string());
                self.stack.save()?;
                self.repo.checkout_branch(name)?;
            }
        }
        Ok(())
    }

    /// Stop tracking a patch, optionally deleting its branch ref. Refused
    /// while the active patch sits above the target: removing a patch from
    /// underneath the working position would orphan the rebase basis of
    /// everything above it.
    pub fn untrack(&mut self, name: &str, delete: bool) -> Result<()> {
        let Some(target) = self.stack.find(name) else {
            Output::warning(format!("Cannot untrack '{name}': not tracked in the stack"));
            return Ok(());
        };

        let current = self.repo.current_branch()?;
        if let Some(index) = self.stack.find(&current) {
            if index > target {
                Output::warning(format!(
                    "Cannot untrack '{name}': the active patch '{current}' is above it in the stack"
                ));
                return Ok(());
            }
        }

        // libgit2 refuses to delete the checked-out branch, so catch this
        // before the stack file is mutated.
        if delete && current == name {
            Output::warning(format!(
                "Cannot delete '{name}': it is the checked-out branch"
            ));
            Output::tip("Run `stk pop` first, or untrack without --delete");
            return Ok(());
        }

        self.stack.remove(target);
        self.stack.save()?;
        tracing::info!("Untracked '{}'", name);

        if delete {
            self.repo.delete_branch(name)?;
        }
        Ok(())
    }
}
