use std::{io::Write, sync::Arc};

use anyhow::Result;

use crate::branches;
use crate::config::Settings;
use crate::git::GitBackend;
use crate::squash;

/// Enumerate, validate, detect, then delete. Returns the deleted branch names.
///
/// Nothing is mutated unless the reference branch exists and every squash
/// check succeeded.
pub fn run<G: GitBackend + 'static, W: Write>(
    git: Arc<G>,
    settings: &Settings,
    output: &mut W,
) -> Result<Vec<String>> {
    let reference = settings.reference_branch.as_str();

    let all = branches::list_local_branches(git.as_ref())?;
    branches::ensure_reference_exists(reference, &all)?;

    let squashed = squash::find_squashed(Arc::clone(&git), reference, &all)?;
    delete_squashed(git.as_ref(), reference, &squashed, output)?;

    Ok(squashed)
}

/// Check out `reference` and force-delete each squashed branch in order,
/// writing git's confirmation line for each one as it completes
pub fn delete_squashed<G: GitBackend + ?Sized, W: Write>(
    git: &G,
    reference: &str,
    squashed: &[String],
    output: &mut W,
) -> Result<()> {
    if squashed.is_empty() {
        tracing::info!("no squashed branches");
        return Ok(());
    }

    // One of the doomed branches may be checked out
    git.checkout(reference)?;

    for branch in squashed {
        let confirmation = git.delete_branch(branch)?;
        writeln!(output, "{}", confirmation)?;
        output.flush()?;
    }

    tracing::info!("deleted {} branch(es)", squashed.len());
    Ok(())
}
