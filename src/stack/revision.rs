use crate::errors::{Result, StackedError};
use crate::git::GitRepository;
use crate::stack::walker::walk_patch;
use crate::stack::PatchStack;
use std::fmt;
use std::str::FromStr;

/// A review revision number, rendered as `D<n>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionId(pub u64);

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "D{}", self.0)
    }
}

impl FromStr for RevisionId {
    type Err = StackedError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('D').or_else(|| s.strip_prefix('d')).unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StackedError::config(format!("Invalid revision id: {s}")));
        }
        digits
            .parse()
            .map(RevisionId)
            .map_err(|_| StackedError::config(format!("Invalid revision id: {s}")))
    }
}

/// Recognizes review-system footers in commit messages. Traversal logic never
/// inspects message text itself, so alternate footer formats only need a new
/// matcher implementation.
pub trait RevisionMatcher {
    /// The revision a commit message declares for its own review
    fn revision(&self, message: &str) -> Option<RevisionId>;

    /// An already-recorded dependency annotation, if any
    fn dependency(&self, message: &str) -> Option<RevisionId>;

    /// The footer line recording a dependency on `rev`
    fn format_dependency(&self, rev: RevisionId) -> String;
}

/// Phabricator-style footers: `Differential Revision: <scheme>://<path>/D<n>`
/// and `Depends on D<n>`.
pub struct DifferentialMatcher;

impl RevisionMatcher for DifferentialMatcher {
    fn revision(&self, message: &str) -> Option<RevisionId> {
        for line in message.lines() {
            let Some(url) = line.trim().strip_prefix("Differential Revision:") else {
                continue;
            };
            let url = url.trim();
            let Some(scheme_end) = url.find("://") else {
                continue;
            };
            if scheme_end == 0 {
                continue;
            }
            let path = &url[scheme_end + 3..];
            let Some(tail) = path.rfind('/').map(|i| &path[i + 1..]) else {
                continue;
            };
            if let Some(rev) = parse_revision_number(tail) {
                return Some(rev);
            }
        }
        None
    }

    fn dependency(&self, message: &str) -> Option<RevisionId> {
        for line in message.lines() {
            let Some(tail) = line.trim().strip_prefix("Depends on ") else {
                continue;
            };
            if let Some(rev) = parse_revision_number(tail) {
                return Some(rev);
            }
        }
        None
    }

    fn format_dependency(&self, rev: RevisionId) -> String {
        format!("Depends on {rev}")
    }
}

fn parse_revision_number(tail: &str) -> Option<RevisionId> {
    let digits = tail.strip_prefix('D')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(RevisionId)
}

/// Resolve the review revision of the patch at `index`: the first
/// `Differential Revision` footer found walking from the patch's tip back
/// toward its predecessor. A patch may span several commits with only one
/// carrying the footer.
pub fn resolve_revision(
    repo: &GitRepository,
    stack: &PatchStack,
    index: usize,
    matcher: &dyn RevisionMatcher,
) -> Result<Option<RevisionId>> {
    for commit in walk_patch(repo, stack, index)? {
        if let Some(rev) = matcher.revision(commit.message().unwrap_or("")) {
            tracing::debug!("Patch {} resolves to {}", index, rev);
            return Ok(Some(rev));
        }
    }
    Ok(None)
}

/// Outcome of a dependency annotation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationOutcome {
    /// Root patch, or the predecessor has no resolvable revision
    Skipped,
    /// The patch's range already carries a dependency footer
    AlreadyRecorded(RevisionId),
    /// The tip commit was amended with a dependency footer
    Recorded(RevisionId),
}

/// Ensure the patch at `index` is marked as depending on its predecessor's
/// review revision. Idempotent: an existing `Depends on` footer anywhere in
/// the patch's own range suppresses the amend. A successful amend rewrites
/// the tip's commit id.
pub fn ensure_dependency_recorded(
    repo: &GitRepository,
    stack: &PatchStack,
    index: usize,
    matcher: &dyn RevisionMatcher,
) -> Result<AnnotationOutcome> {
    if index < 1 {
        return Ok(AnnotationOutcome::Skipped);
    }

    let Some(parent_rev) = resolve_revision(repo, stack, index - 1, matcher)? else {
        tracing::debug!("Predecessor of patch {} has no revision, skipping", index);
        return Ok(AnnotationOutcome::Skipped);
    };

    for commit in walk_patch(repo, stack, index)? {
        if let Some(existing) = matcher.dependency(commit.message().unwrap_or("")) {
            return Ok(AnnotationOutcome::AlreadyRecorded(existing));
        }
    }

    let patch = stack
        .get(index)
        .ok_or_else(|| StackedError::state(format!("No patch at index {index}")))?;
    let tip_message = repo.branch_commit(patch)?.message().unwrap_or("").to_string();
    let amended = format!(
        "{}\n\n{}\n",
        tip_message.trim_end(),
        matcher.format_dependency(parent_rev)
    );
    repo.amend_branch_message(patch, &amended)?;

    Ok(AnnotationOutcome::Recorded(parent_rev))
}
