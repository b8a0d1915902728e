use anyhow::Result;

use crate::error::Error;
use crate::git::GitBackend;

/// All local branch names. No particular order is guaranteed.
pub fn list_local_branches<G: GitBackend + ?Sized>(git: &G) -> Result<Vec<String>> {
    let branches = git.list_branches()?;
    tracing::debug!("found {} local branch(es)", branches.len());
    Ok(branches)
}

/// Fail unless `reference` is one of the enumerated branches
pub fn ensure_reference_exists(reference: &str, branches: &[String]) -> Result<(), Error> {
    if branches.iter().any(|b| b == reference) {
        Ok(())
    } else {
        Err(Error::BranchNotFound(reference.to_string()))
    }
}
