use anyhow::Result;

/// The git primitives the squash detector and the cleanup pipeline rely on.
///
/// Every method maps onto one git invocation. A non-zero exit is an error;
/// on success the captured stdout is returned without its trailing newline.
pub trait GitBackend: Send + Sync {
    /// Short names of every ref under `refs/heads/`, in the order git yields them.
    fn list_branches(&self) -> Result<Vec<String>>;

    /// Most recent common ancestor of two revisions.
    fn merge_base(&self, a: &str, b: &str) -> Result<String>;

    /// Tree object of the commit `rev` points at.
    fn tree_of(&self, rev: &str) -> Result<String>;

    /// Create a commit not attached to any ref and return its hash.
    fn commit_tree(&self, tree: &str, parent: &str, message: &str) -> Result<String>;

    /// Raw `git cherry <upstream> <head>` listing.
    fn cherry(&self, upstream: &str, head: &str) -> Result<String>;

    /// Switch the working checkout to `rev`.
    fn checkout(&self, rev: &str) -> Result<()>;

    /// Force-delete a local branch, returning git's confirmation line.
    fn delete_branch(&self, name: &str) -> Result<String>;
}
