//! Scripted in-memory `GitBackend` that records every call, for unit tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use anyhow::Result;

use super::traits::GitBackend;
use crate::error::Error;

pub struct FakeGit {
    branches: Vec<String>,
    cherry: HashMap<String, String>,
    failing_merge_base: HashSet<String>,
    failing_delete: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeGit {
    /// Repository whose branches are all unmerged until told otherwise
    pub fn new(branches: &[&str]) -> Self {
        FakeGit {
            branches: branches.iter().map(|b| b.to_string()).collect(),
            cherry: HashMap::new(),
            failing_merge_base: HashSet::new(),
            failing_delete: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Make `git cherry` report the synthetic commit for `branch` as already upstream
    pub fn squashed(self, branch: &str) -> Self {
        self.cherry_output(branch, &format!("- synthetic-{}", branch))
    }

    pub fn cherry_output(mut self, branch: &str, listing: &str) -> Self {
        self.cherry.insert(branch.to_string(), listing.to_string());
        self
    }

    pub fn fail_merge_base(mut self, branch: &str) -> Self {
        self.failing_merge_base.insert(branch.to_string());
        self
    }

    pub fn fail_delete(mut self, branch: &str) -> Self {
        self.failing_delete.insert(branch.to_string());
        self
    }

    /// Every call made so far, formatted like the git command line it stands for
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that change refs or the working tree
    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("checkout") || c.starts_with("branch -D"))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn failure(command: String) -> anyhow::Error {
        Error::Git {
            command,
            stderr: "fatal: scripted failure".to_string(),
        }
        .into()
    }
}

impl GitBackend for FakeGit {
    fn list_branches(&self) -> Result<Vec<String>> {
        self.record("for-each-ref".to_string());
        Ok(self.branches.clone())
    }

    fn merge_base(&self, a: &str, b: &str) -> Result<String> {
        let call = format!("merge-base {} {}", a, b);
        self.record(call.clone());
        if self.failing_merge_base.contains(b) {
            return Err(Self::failure(call));
        }
        Ok(format!("base-{}", b))
    }

    fn tree_of(&self, rev: &str) -> Result<String> {
        self.record(format!("rev-parse {}^{{tree}}", rev));
        Ok(format!("tree-{}", rev))
    }

    fn commit_tree(&self, tree: &str, parent: &str, message: &str) -> Result<String> {
        self.record(format!("commit-tree {} -p {} -m {}", tree, parent, message));
        let branch = tree.strip_prefix("tree-").unwrap_or(tree);
        Ok(format!("synthetic-{}", branch))
    }

    fn cherry(&self, upstream: &str, head: &str) -> Result<String> {
        self.record(format!("cherry {} {}", upstream, head));
        let branch = head.strip_prefix("synthetic-").unwrap_or(head);
        Ok(self
            .cherry
            .get(branch)
            .cloned()
            .unwrap_or_else(|| format!("+ {}", head)))
    }

    fn checkout(&self, rev: &str) -> Result<()> {
        self.record(format!("checkout {}", rev));
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<String> {
        let call = format!("branch -D {}", name);
        self.record(call.clone());
        if self.failing_delete.contains(name) {
            return Err(Self::failure(call));
        }
        Ok(format!("Deleted branch {} (was 1a2b3c4).", name))
    }
}
