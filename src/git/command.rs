use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::Result;

use super::traits::GitBackend;
use crate::error::Error;

/// `GitBackend` that shells out to the `git` binary
pub struct CommandGit {
    repo_dir: PathBuf,
}

impl CommandGit {
    /// Create a backend running git against the repository at `repo_dir`
    pub fn new<P: AsRef<Path>>(repo_dir: P) -> Self {
        CommandGit {
            repo_dir: repo_dir.as_ref().to_path_buf(),
        }
    }

    /// Run git with `args` and return its stdout minus the trailing newline
    fn run(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(args)
            .output()
            .map_err(Error::from)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Git {
                command: args.join(" "),
                stderr: single_line(&stderr),
            }
            .into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(strip_trailing_newline(&stdout).to_string())
    }
}

/// Join git's stderr into one line so a failure reports as a single message
fn single_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Drop exactly one trailing newline, leaving any other whitespace alone
fn strip_trailing_newline(s: &str) -> &str {
    s.strip_suffix('\n').unwrap_or(s)
}

impl GitBackend for CommandGit {
    fn list_branches(&self) -> Result<Vec<String>> {
        let output = self.run(&["for-each-ref", "refs/heads/", "--format=%(refname:short)"])?;
        Ok(output
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        self.run(&["merge-base", a, b])
    }

    fn tree_of(&self, rev: &str) -> Result<String> {
        let tree_spec = format!("{}^{{tree}}", rev);
        self.run(&["rev-parse", tree_spec.as_str()])
    }

    fn commit_tree(&self, tree: &str, parent: &str, message: &str) -> Result<String> {
        self.run(&["commit-tree", tree, "-p", parent, "-m", message])
    }

    fn cherry(&self, upstream: &str, head: &str) -> Result<String> {
        self.run(&["cherry", upstream, head])
    }

    fn checkout(&self, rev: &str) -> Result<()> {
        self.run(&["checkout", rev]).map(|_| ())
    }

    fn delete_branch(&self, name: &str) -> Result<String> {
        self.run(&["branch", "-D", name])
    }
}
