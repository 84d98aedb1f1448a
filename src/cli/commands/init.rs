use super::open_initialized;
use crate::cli::output::Output;
use crate::config;
use crate::errors::{Result, StackedError};
use crate::git::get_current_repository;

/// Initialize stack management with `root` as the bottom of the stack
pub fn init(root: &str) -> Result<()> {
    let repo = get_current_repository()?;

    if config::is_repo_initialized(&repo) {
        Output::warning("This repository is already under stack management");
        return Ok(());
    }

    if !repo.branch_exists(root) {
        return Err(StackedError::branch(format!(
            "Root branch '{root}' does not exist"
        )));
    }

    config::initialize_repo(&repo, root)?;
    Output::success(format!("Initialized stack with root '{root}'"));
    Output::tip("Run `stk push --new <name>` to start a patch");
    Ok(())
}

/// Render the stack with the active patch highlighted
pub fn show() -> Result<()> {
    let Some((repo, stack)) = open_initialized()? else {
        return Ok(());
    };

    let active = repo.current_branch()?;
    Output::render_stack(stack.patches(), &active);

    let branches = repo.list_branches()?;
    for patch in stack.patches() {
        if !branches.iter().any(|b| b == patch) {
            Output::warning(format!("Tracked patch '{patch}' has no local branch"));
        }
    }
    Ok(())
}

/// Tear down stack management state
pub fn deinit() -> Result<()> {
    let repo = get_current_repository()?;
    config::deinitialize_repo(&repo)?;
    Output::success("Removed stack management state");
    Ok(())
}
