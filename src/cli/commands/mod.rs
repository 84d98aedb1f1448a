pub mod init;
pub mod navigate;
pub mod review;

use crate::cli::output::Output;
use crate::config;
use crate::errors::Result;
use crate::git::{get_current_repository, GitRepository};
use crate::stack::PatchStack;

/// Open the surrounding repository and load the stack handle, printing
/// guidance and returning None when the repository is not under stack
/// management.
pub(crate) fn open_initialized() -> Result<Option<(GitRepository, PatchStack)>> {
    let repo = get_current_repository()?;
    if !config::is_repo_initialized(&repo) {
        Output::warning("This repository is not under stack management");
        Output::tip("Run `stk init <root>` to initialize it");
        return Ok(None);
    }

    let stack = PatchStack::load(&config::stack_file_path(&repo)?)?;
    Ok(Some((repo, stack)))
}
