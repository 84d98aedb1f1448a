//! The stack engine: the ordered patch-stack data structure, history
//! walking, review-revision resolution and dependency annotation, push/pop
//! navigation, and the land-time ancestry cascade.

pub mod land;
pub mod navigator;
pub mod revision;
pub mod store;
pub mod walker;

pub use navigator::Navigator;
pub use revision::{
    ensure_dependency_recorded, resolve_revision, AnnotationOutcome, DifferentialMatcher,
    RevisionId, RevisionMatcher,
};
pub use store::{init_stack_file, PatchStack};
pub use walker::{walk_patch, FirstParentWalk, WALK_LIMIT};
