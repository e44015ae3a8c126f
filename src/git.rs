use std::path::{Path, PathBuf};
use std::process::Command as GitCommand;

use crate::error::RepoError;

/// Record separator for `git log`; NUL cannot appear in a commit message.
const COMMIT_SEPARATOR: char = '\0';

/// Read-only view of the repository state the drafting pipeline needs.
pub trait Repository {
    /// Top-level directory of the working tree.
    fn root(&self) -> &Path;

    fn current_branch(&self) -> Result<String, RepoError>;

    fn branch_exists(&self, name: &str) -> Result<bool, RepoError>;

    /// Full messages of commits in `base..head`, oldest first.
    fn commits_between(&self, base: &str, head: &str) -> Result<Vec<String>, RepoError>;

    /// Paths touched in `base..head`, in the order git reports them.
    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, RepoError>;

    /// Unified diff for `base..head`.
    fn diff(&self, base: &str, head: &str) -> Result<String, RepoError>;
}

/// Repository backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self, RepoError> {
        let output = GitCommand::new("git")
            .arg("-C")
            .arg(path)
            .args(["rev-parse", "--show-toplevel"])
            .output()?;

        if !output.status.success() {
            return Err(RepoError::NotARepository(path.to_path_buf()));
        }

        let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
        log::debug!("Opened repository at {root}");
        Ok(GitCli {
            root: PathBuf::from(root),
        })
    }

    /// Run a git command inside the repository and capture stdout as String.
    fn git_output(&self, args: &[&str]) -> Result<String, RepoError> {
        log::trace!("git {:?}", args);

        let output = GitCommand::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()?;

        if !output.status.success() {
            return Err(RepoError::Command {
                args: args.iter().map(|a| a.to_string()).collect(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Repository for GitCli {
    fn root(&self) -> &Path {
        &self.root
    }

    fn current_branch(&self) -> Result<String, RepoError> {
        let name = self
            .git_output(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string();
        Ok(name)
    }

    fn branch_exists(&self, name: &str) -> Result<bool, RepoError> {
        let reference = format!("refs/heads/{name}");
        let status = GitCommand::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(["rev-parse", "--verify", "--quiet", &reference])
            .output()?
            .status;
        Ok(status.success())
    }

    fn commits_between(&self, base: &str, head: &str) -> Result<Vec<String>, RepoError> {
        let range = format!("{base}..{head}");
        let format = "--pretty=format:%B%x00";
        let log_output = self.git_output(&["log", "--reverse", format, &range])?;
        Ok(parse_log_messages(&log_output))
    }

    fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, RepoError> {
        let range = format!("{base}..{head}");
        let output = self.git_output(&["diff", "--name-only", &range])?;
        let files = output
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        Ok(files)
    }

    fn diff(&self, base: &str, head: &str) -> Result<String, RepoError> {
        let range = format!("{base}..{head}");
        self.git_output(&["diff", &range])
    }
}

/// Split NUL-separated `git log` output into trimmed messages.
fn parse_log_messages(log_output: &str) -> Vec<String> {
    log_output
        .split(COMMIT_SEPARATOR)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}
