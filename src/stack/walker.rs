use crate::errors::Result;
use crate::git::GitRepository;
use crate::stack::PatchStack;
use git2::{Commit, Oid};

/// Hard cap on commits visited per walk. Keeps a walk bounded when the stack
/// bookkeeping and the repository's actual ancestry have diverged (e.g. after
/// an external rebase); degradation is truncation, never a whole-history scan.
pub const WALK_LIMIT: usize = 15;

/// Lazy first-parent traversal of one patch's commit range.
///
/// Starts at the patch's tip and follows first parents, stopping before
/// yielding the boundary patch's commit, before yielding the stack root's
/// commit, after `WALK_LIMIT` commits, or when a commit has no parent.
/// Endpoints are resolved once at construction; the walk is not restartable.
pub struct FirstParentWalk<'repo> {
    next: Option<Commit<'repo>>,
    boundary: Option<Oid>,
    root: Option<Oid>,
    remaining: usize,
}

impl<'repo> FirstParentWalk<'repo> {
    pub fn new(
        repo: &'repo GitRepository,
        from: &str,
        boundary: Option<&str>,
        root: Option<&str>,
    ) -> Result<Self> {
        let tip = repo.branch_commit(from)?;
        let boundary = boundary
            .map(|name| repo.resolve_reference(name).map(|c| c.id()))
            .transpose()?;
        let root = root
            .map(|name| repo.resolve_reference(name).map(|c| c.id()))
            .transpose()?;

        Ok(Self {
            next: Some(tip),
            boundary,
            root,
            remaining: WALK_LIMIT,
        })
    }
}

impl<'repo> Iterator for FirstParentWalk<'repo> {
    type Item = Commit<'repo>;

    fn next(&mut self) -> Option<Commit<'repo>> {
        let current = self.next.take()?;
        if self.remaining == 0 {
            return None;
        }
        let id = current.id();
        if Some(id) == self.boundary || Some(id) == self.root {
            return None;
        }
        self.remaining -= 1;
        self.next = current.parent(0).ok();
        Some(current)
    }
}

/// Walk the commits belonging to the patch at `index`: from its tip back
/// toward its predecessor's tip. The root patch has no predecessor, so its
/// walk runs until the cap or a parentless commit.
pub fn walk_patch<'repo>(
    repo: &'repo GitRepository,
    stack: &PatchStack,
    index: usize,
) -> Result<FirstParentWalk<'repo>> {
    let from = stack.get(index).ok_or_else(|| {
        crate::errors::StackedError::state(format!("No patch at index {index}"))
    })?;

    let (boundary, root) = if index > 0 {
        (stack.get(index - 1), stack.root())
    } else {
        (None, None)
    };

    FirstParentWalk::new(repo, from, boundary, root)
}
