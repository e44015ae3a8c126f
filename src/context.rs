use crate::error::RepoError;
use crate::git::Repository;

const BASE_BRANCH_CANDIDATES: [&str; 2] = ["main", "master"];

/// Everything the drafting pipeline knows about the current branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub base: String,
    pub branch: String,
    /// Commit messages unique to `branch`, oldest first.
    pub commits: Vec<String>,
    pub files: Vec<String>,
}

impl BranchContext {
    /// No commits and no changed files: there is nothing to describe.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty() && self.files.is_empty()
    }
}

/// Unified diff of the branch, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffText {
    Available(String),
    Unavailable(String),
}

/// Prefer `main`, fall back to `master`.
pub fn detect_base_branch(repo: &dyn Repository) -> Result<String, RepoError> {
    for candidate in BASE_BRANCH_CANDIDATES {
        if repo.branch_exists(candidate)? {
            return Ok(candidate.to_string());
        }
    }
    Err(RepoError::NoBaseBranch)
}

pub fn extract(repo: &dyn Repository) -> Result<BranchContext, RepoError> {
    let base = detect_base_branch(repo)?;
    let branch = repo.current_branch()?;
    let commits = repo.commits_between(&base, &branch)?;
    let files = repo.changed_files(&base, &branch)?;

    log::debug!(
        "Branch {branch} against {base}: {} commit(s), {} changed file(s)",
        commits.len(),
        files.len()
    );

    Ok(BranchContext {
        base,
        branch,
        commits,
        files,
    })
}

/// Fetch the branch diff. Errors never escape; they become [`DiffText::Unavailable`].
pub fn fetch_diff(repo: &dyn Repository, ctx: &BranchContext) -> DiffText {
    match repo.diff(&ctx.base, &ctx.branch) {
        Ok(diff) => DiffText::Available(diff),
        Err(e) => {
            log::warn!("Could not retrieve diff: {e}");
            DiffText::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::FakeRepo;

    #[test]
    fn prefers_main_over_master() {
        let mut repo = FakeRepo::on_branch("feature");
        repo.branches = vec!["master".into(), "main".into(), "feature".into()];
        assert_eq!(detect_base_branch(&repo).unwrap(), "main");
    }

    #[test]
    fn falls_back_to_master() {
        let mut repo = FakeRepo::on_branch("feature");
        repo.branches = vec!["master".into(), "feature".into()];
        assert_eq!(detect_base_branch(&repo).unwrap(), "master");
    }

    #[test]
    fn missing_base_branch_is_an_error() {
        let mut repo = FakeRepo::on_branch("feature");
        repo.branches = vec!["develop".into(), "feature".into()];
        assert!(matches!(
            detect_base_branch(&repo),
            Err(RepoError::NoBaseBranch)
        ));
        assert!(extract(&repo).is_err());
    }

    #[test]
    fn extract_collects_commits_and_files() {
        let repo = FakeRepo::on_branch("feat-retry")
            .with_commits(&["first", "second"])
            .with_files(&["src/b.rs", "src/a.rs"]);
        let ctx = extract(&repo).unwrap();
        assert_eq!(ctx.base, "main");
        assert_eq!(ctx.branch, "feat-retry");
        assert_eq!(ctx.commits, vec!["first", "second"]);
        assert_eq!(ctx.files, vec!["src/b.rs", "src/a.rs"]);
        assert!(!ctx.is_empty());
    }

    #[test]
    fn empty_only_when_both_lists_are_empty() {
        let repo = FakeRepo::on_branch("x").with_files(&["README.md"]);
        let ctx = extract(&repo).unwrap();
        assert!(ctx.commits.is_empty());
        assert!(!ctx.is_empty());
    }

    #[test]
    fn diff_failure_becomes_unavailable() {
        let repo = FakeRepo::on_branch("x").with_diff(None);
        let ctx = extract(&repo).unwrap();
        assert!(matches!(fetch_diff(&repo, &ctx), DiffText::Unavailable(_)));
    }
}
