use super::open_initialized;
use crate::cli::output::Output;
use crate::config;
use crate::config::Settings;
use crate::errors::Result;
use crate::git::{shell, GitRepository};
use crate::review::{ArcTool, ReviewBackend, SubmitOptions};
use crate::stack::{
    self, ensure_dependency_recorded, AnnotationOutcome, DifferentialMatcher, PatchStack,
    RevisionId,
};

/// The active patch's index and its predecessor's name, with precondition
/// messages for the untracked and bottom-of-stack cases.
fn current_above_root(repo: &GitRepository, stack: &PatchStack) -> Result<Option<(usize, String)>> {
    let current = repo.current_branch()?;
    match stack.find(&current) {
        None => {
            Output::warning(format!("'{current}' is not tracked in the stack"));
            Ok(None)
        }
        Some(0) => {
            Output::warning("Cannot operate on the bottom of the stack");
            Output::tip("Run `stk push` first");
            Ok(None)
        }
        Some(index) => {
            let prev = stack
                .get(index - 1)
                .map(str::to_string)
                .ok_or_else(|| crate::StackedError::state(format!("No patch at index {}", index - 1)))?;
            Ok(Some((index, prev)))
        }
    }
}

fn review_tool(repo: &GitRepository) -> Result<ArcTool> {
    let settings = Settings::load_from_file(&config::settings_path(repo)?)?;
    Ok(ArcTool::new(settings.review.program, repo.path()))
}

/// Diff the current patch against its predecessor's tip
pub fn diff() -> Result<()> {
    let Some((repo, stack)) = open_initialized()? else {
        return Ok(());
    };
    let Some((_, prev)) = current_above_root(&repo, &stack)? else {
        return Ok(());
    };

    shell::diff_against(repo.path(), &prev)
}

/// Log the commits unique to the current patch
pub fn log() -> Result<()> {
    let Some((repo, stack)) = open_initialized()? else {
        return Ok(());
    };
    let Some((_, prev)) = current_above_root(&repo, &stack)? else {
        return Ok(());
    };

    shell::log_against(repo.path(), &prev)
}

/// Submit the current patch for review. Records the dependency on the
/// predecessor's revision first, so stacked revisions always carry their
/// `Depends on` footer.
pub fn submit(update: Option<String>, create: bool, edit: bool) -> Result<()> {
    let Some((repo, stack)) = open_initialized()? else {
        return Ok(());
    };
    let Some((index, prev)) = current_above_root(&repo, &stack)? else {
        return Ok(());
    };

    let matcher = DifferentialMatcher;
    match ensure_dependency_recorded(&repo, &stack, index, &matcher)? {
        AnnotationOutcome::Recorded(rev) => {
            Output::info(format!("Recorded dependency on {rev}"));
        }
        AnnotationOutcome::AlreadyRecorded(rev) => {
            tracing::debug!("Dependency on {} already recorded", rev);
        }
        AnnotationOutcome::Skipped => {}
    }

    let opts = SubmitOptions {
        update: update.map(|s| s.parse::<RevisionId>()).transpose()?,
        create,
        edit,
    };
    review_tool(&repo)?.submit(&prev, &opts)
}

/// Land the bottom-most patch and relink the remaining stack
pub fn land() -> Result<()> {
    let Some((repo, mut stack)) = open_initialized()? else {
        return Ok(());
    };

    let review = review_tool(&repo)?;
    stack::land::land(&repo, &mut stack, &review)
}
