use crate::cli::output::Output;
use crate::errors::{Result, StackedError};
use crate::git::GitRepository;
use crate::review::ReviewBackend;
use crate::stack::walker::walk_patch;
use crate::stack::PatchStack;
use git2::Oid;

/// Land the bottom-most non-root patch and restructure the remaining stack's
/// ancestry onto the new bottom.
///
/// Ordering is load-bearing: every remaining patch's root commit is computed
/// before the external land action runs, and the stack is only mutated after
/// that action succeeds.
pub fn land(
    repo: &GitRepository,
    stack: &mut PatchStack,
    review: &dyn ReviewBackend,
) -> Result<()> {
    let current = repo.current_branch()?;
    match stack.find(&current) {
        None => {
            Output::warning(format!("Cannot land: '{current}' is not tracked in the stack"));
            return Ok(());
        }
        Some(1) => {}
        Some(_) => {
            Output::warning("Can only land the first patch above the root");
            return Ok(());
        }
    }

    // Root commit per remaining patch: the earliest commit of its own range,
    // None when the branch pointer coincides with its predecessor's tip.
    let mut roots: Vec<(String, Option<Oid>)> = Vec::new();
    for index in (1..stack.len()).rev() {
        let name = stack
            .get(index)
            .map(str::to_string)
            .ok_or_else(|| StackedError::state(format!("No patch at index {index}")))?;
        let root = walk_patch(repo, stack, index)?.last().map(|c| c.id());
        roots.push((name, root));
    }

    // A failed land must leave the stack untouched.
    review.land()?;

    let landed = stack.remove(1);
    stack.save()?;
    tracing::info!("Landed '{}'", landed);

    // Relink: walk up from the new root's tip, rewriting each patch's root
    // commit onto the chain built so far.
    let root_patch = stack
        .root()
        .ok_or_else(|| StackedError::state("Stack has no root"))?
        .to_string();
    let mut last_parent = repo.resolve_reference(&root_patch)?.id();

    for index in 1..stack.len() {
        let name = stack
            .get(index)
            .map(str::to_string)
            .ok_or_else(|| StackedError::state(format!("No patch at index {index}")))?;
        let root = roots
            .iter()
            .find(|(n, _)| n == &name)
            .and_then(|(_, root)| *root);

        last_parent = match root {
            Some(oid) => repo.reparent_branch(&name, oid, last_parent)?,
            None => {
                repo.reset_branch(&name, last_parent)?;
                last_parent
            }
        };
    }

    Output::success(format!("Landed '{landed}'"));
    Ok(())
}
