//! End-to-end flows over a real temporary repository: initialize, grow a
//! stack of patches, annotate dependencies, and land the bottom patch.

use git2::{Oid, Repository, Signature};
use stacked_cli::config;
use stacked_cli::errors::Result;
use stacked_cli::git::GitRepository;
use stacked_cli::review::{ReviewBackend, SubmitOptions};
use stacked_cli::stack::{
    self, ensure_dependency_recorded, AnnotationOutcome, DifferentialMatcher, Navigator,
    PatchStack, RevisionId,
};
use tempfile::TempDir;

struct Fixture {
    _tmp: TempDir,
    repo: GitRepository,
}

impl Fixture {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let raw = Repository::init(tmp.path()).unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let tree_id = raw.index().unwrap().write_tree().unwrap();
        let tree = raw.find_tree(tree_id).unwrap();
        raw.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
            .unwrap();

        let repo = GitRepository::open(tmp.path()).unwrap();
        Fixture { _tmp: tmp, repo }
    }

    fn commit(&self, message: &str) -> Oid {
        let raw = Repository::open(self.repo.path()).unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let parent = raw.head().unwrap().peel_to_commit().unwrap();
        let tree = parent.tree().unwrap();
        raw.commit(Some("HEAD"), &sig, &sig, message, &tree, &[&parent])
            .unwrap()
    }

    fn load_stack(&self) -> PatchStack {
        PatchStack::load(&config::stack_file_path(&self.repo).unwrap()).unwrap()
    }
}

/// Fast-forwards the root branch to the landed patch's tip, standing in for
/// the review tool's land action.
struct MergingReview {
    repo_path: std::path::PathBuf,
    root: String,
    landed_branch: String,
}

impl ReviewBackend for MergingReview {
    fn submit(&self, _base: &str, _opts: &SubmitOptions) -> Result<()> {
        Ok(())
    }

    fn land(&self) -> Result<()> {
        let raw = Repository::open(&self.repo_path).unwrap();
        let target = raw
            .find_branch(&self.landed_branch, git2::BranchType::Local)
            .unwrap()
            .get()
            .peel_to_commit()
            .unwrap()
            .id();
        raw.find_reference(&format!("refs/heads/{}", self.root))
            .unwrap()
            .set_target(target, "test land")
            .unwrap();
        Ok(())
    }
}

#[test]
fn test_full_stack_lifecycle() {
    let f = Fixture::new();
    let root = f.repo.current_branch().unwrap();

    // Initialize stack management.
    assert!(!config::is_repo_initialized(&f.repo));
    config::initialize_repo(&f.repo, &root).unwrap();
    assert!(config::is_repo_initialized(&f.repo));

    // Grow a two-patch stack with one reviewed commit each.
    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack)
        .push_new("feature-a")
        .unwrap();
    f.commit("feature a\n\nDifferential Revision: https://phab.example.com/D11\n");

    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack)
        .push_new("feature-b")
        .unwrap();
    f.commit("feature b\n\nDifferential Revision: https://phab.example.com/D22\n");

    let stack = f.load_stack();
    assert_eq!(
        stack.patches(),
        &[root.clone(), "feature-a".to_string(), "feature-b".to_string()]
    );

    // Annotate feature-b as depending on feature-a's revision.
    let matcher = DifferentialMatcher;
    let outcome = ensure_dependency_recorded(&f.repo, &stack, 2, &matcher).unwrap();
    assert_eq!(outcome, AnnotationOutcome::Recorded(RevisionId(11)));
    let message = f
        .repo
        .branch_commit("feature-b")
        .unwrap()
        .message()
        .unwrap()
        .to_string();
    assert!(message.contains("Depends on D11"));

    // Amending the tip must not lose the revision footer.
    assert_eq!(
        stack::resolve_revision(&f.repo, &stack, 2, &matcher).unwrap(),
        Some(RevisionId(22))
    );

    // Land feature-a from directly above the root.
    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack).pop(false).unwrap();
    assert_eq!(f.repo.current_branch().unwrap(), "feature-a");

    let review = MergingReview {
        repo_path: f.repo.path().to_path_buf(),
        root: root.clone(),
        landed_branch: "feature-a".to_string(),
    };
    stack::land::land(&f.repo, &mut stack, &review).unwrap();

    let stack = f.load_stack();
    assert_eq!(stack.patches(), &[root.clone(), "feature-b".to_string()]);

    // feature-b's remaining chain sits directly on the new bottom.
    let root_tip = f.repo.resolve_reference(&root).unwrap().id();
    let b_tip = f.repo.branch_commit("feature-b").unwrap();
    assert_eq!(b_tip.parent(0).unwrap().id(), root_tip);
}

#[test]
fn test_untrack_guard_and_pop_all() {
    let f = Fixture::new();
    let root = f.repo.current_branch().unwrap();
    config::initialize_repo(&f.repo, &root).unwrap();

    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack)
        .push_new("feature-a")
        .unwrap();
    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack)
        .push_new("feature-b")
        .unwrap();

    // Active patch is feature-b; untracking feature-a must be refused.
    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack)
        .untrack("feature-a", false)
        .unwrap();
    assert_eq!(
        f.load_stack().patches(),
        &[root.clone(), "feature-a".to_string(), "feature-b".to_string()]
    );

    // Pop all the way down, then untracking works.
    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack).pop(true).unwrap();
    assert_eq!(f.repo.current_branch().unwrap(), root);

    let mut stack = f.load_stack();
    Navigator::new(&f.repo, &mut stack)
        .untrack("feature-a", true)
        .unwrap();
    assert_eq!(
        f.load_stack().patches(),
        &[root, "feature-b".to_string()]
    );
    assert!(!f.repo.branch_exists("feature-a"));
}
