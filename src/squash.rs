//! Squash detection
//!
//! A squash-merge replays a branch's whole diff as one new commit on the
//! reference branch, so commit hashes never match. Instead we build a dangling
//! commit holding the candidate's tip tree on top of its merge-base with the
//! reference branch, and ask `git cherry` whether a patch-equivalent commit
//! already exists upstream.

use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinSet;

use crate::git::GitBackend;

/// Decide whether every change on `candidate` is already in `reference`
pub fn is_squashed<G: GitBackend + ?Sized>(
    git: &G,
    reference: &str,
    candidate: &str,
) -> Result<bool> {
    let ancestor = git.merge_base(reference, candidate)?;
    let tree = git.tree_of(candidate)?;
    let synthetic = git.commit_tree(&tree, &ancestor, &synthetic_message(candidate))?;
    let listing = git.cherry(reference, &synthetic)?;

    let squashed = parse_cherry(&listing);
    tracing::debug!(
        "{}: merge-base {}, synthetic {}, squashed: {}",
        candidate,
        ancestor,
        synthetic,
        squashed
    );
    Ok(squashed)
}

/// Message for the dangling commit standing in for `branch`
pub fn synthetic_message(branch: &str) -> String {
    format!("Temp commit for {}", branch)
}

/// Read a `git cherry` listing. `-` on the first line means an equivalent patch
/// is already upstream. An empty listing gives nothing to compare and counts as
/// not squashed.
pub fn parse_cherry(listing: &str) -> bool {
    match listing.lines().next() {
        Some(first) => first.starts_with('-'),
        None => false,
    }
}

/// Check every branch except `reference` concurrently and return the squashed
/// ones in enumeration order. Any failed check fails the whole call.
pub fn find_squashed<G: GitBackend + 'static>(
    git: Arc<G>,
    reference: &str,
    branches: &[String],
) -> Result<Vec<String>> {
    let candidates: Vec<String> = branches
        .iter()
        .filter(|b| b.as_str() != reference)
        .cloned()
        .collect();

    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(
        "checking {} branch(es) against '{}'",
        candidates.len(),
        reference
    );

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(check_all(git, reference.to_string(), candidates))
}

async fn check_all<G: GitBackend + 'static>(
    git: Arc<G>,
    reference: String,
    candidates: Vec<String>,
) -> Result<Vec<String>> {
    let progress = progress_bar(candidates.len());

    let mut tasks = JoinSet::new();
    for (index, candidate) in candidates.into_iter().enumerate() {
        let git = Arc::clone(&git);
        let reference = reference.clone();
        tasks.spawn_blocking(move || {
            let verdict = is_squashed(git.as_ref(), &reference, &candidate);
            (index, candidate, verdict)
        });
    }

    let mut squashed = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, candidate, verdict) = joined.context("Squash check task failed")?;
        progress.inc(1);
        if verdict.with_context(|| format!("Failed to check branch '{}'", candidate))? {
            squashed.push((index, candidate));
        }
    }
    progress.finish_and_clear();

    squashed.sort_by_key(|(index, _)| *index);
    Ok(squashed.into_iter().map(|(_, name)| name).collect())
}

fn progress_bar(len: usize) -> ProgressBar {
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) =
        ProgressStyle::default_bar().template("  {msg} [{bar:40.cyan/blue}] {pos}/{len} branches")
    {
        bar.set_style(style.progress_chars("█▓░"));
    }
    bar.set_message("Checking branches");
    bar
}
