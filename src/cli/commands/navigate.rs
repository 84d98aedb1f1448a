use super::open_initialized;
use crate::config;
use crate::config::Settings;
use crate::errors::Result;
use crate::stack::Navigator;

/// Move up the stack: to the next tracked patch, onto an existing branch,
/// or onto a freshly created branch.
pub fn push(branch: Option<String>, new: Option<String>, no_rebase: bool) -> Result<()> {
    let Some((repo, mut stack)) = open_initialized()? else {
        return Ok(());
    };

    let settings = Settings::load_from_file(&config::settings_path(&repo)?)?;
    let rebase = settings.git.rebase_on_push && !no_rebase;

    let mut nav = Navigator::new(&repo, &mut stack);
    match (branch, new) {
        (Some(name), _) => nav.push_existing(&name, rebase),
        (None, Some(name)) => nav.push_new(&name),
        (None, None) => nav.push_one(rebase),
    }
}

/// Move down the stack, or to its bottom with `all`
pub fn pop(all: bool) -> Result<()> {
    let Some((repo, mut stack)) = open_initialized()? else {
        return Ok(());
    };

    Navigator::new(&repo, &mut stack).pop(all)
}

/// Stop tracking a patch, optionally deleting its branch
pub fn untrack(name: &str, delete: bool) -> Result<()> {
    let Some((repo, mut stack)) = open_initialized()? else {
        return Ok(());
    };

    Navigator::new(&repo, &mut stack).untrack(name, delete)
}
