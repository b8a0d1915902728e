use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable consulted when no branch is given on the command line
pub const BRANCH_ENV_VAR: &str = "DEFAULT_BRANCH_NAME";

/// Config files looked up in the repository directory, in order
pub const CONFIG_FILES: [&str; 2] = [".gds", ".git-delete-squashed"];

/// Used when no other source names a reference branch
pub const DEFAULT_BRANCH: &str = "master";

/// Per-repository config file contents
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoConfig {
    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Settings resolved once at startup and handed to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Branch that squashed branches are compared against
    pub reference_branch: String,
    /// Repository to operate on
    pub repo_dir: PathBuf,
}

impl Settings {
    /// Resolve settings from the command line, the environment and the repo config file
    pub fn load(cli_branch: Option<String>, repo_dir: PathBuf) -> Self {
        let env_branch = env::var(BRANCH_ENV_VAR).ok();
        let reference_branch = resolve_branch(cli_branch, env_branch, &repo_dir);
        tracing::debug!(
            "reference branch '{}' in {:?}",
            reference_branch,
            repo_dir
        );
        Settings {
            reference_branch,
            repo_dir,
        }
    }
}

/// Pick the reference branch: argument, then env var, then config file, then `master`.
/// Empty values count as absent.
pub fn resolve_branch(
    cli_branch: Option<String>,
    env_branch: Option<String>,
    repo_dir: &Path,
) -> String {
    non_empty(cli_branch)
        .or_else(|| non_empty(env_branch))
        .or_else(|| non_empty(config_branch(repo_dir)))
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Branch named by the repo config file, if any. Unreadable or malformed files are ignored.
pub fn config_branch(repo_dir: &Path) -> Option<String> {
    let path = config_file_path(repo_dir)?;
    match RepoConfig::load_from_file(&path) {
        Ok(config) => config.default_branch,
        Err(e) => {
            tracing::debug!("ignoring config file {:?}: {:#}", path, e);
            None
        }
    }
}

/// First config file that exists. A present `.gds` wins even if it is unusable.
pub fn config_file_path(repo_dir: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| repo_dir.join(name))
        .find(|path| path.exists())
}

impl RepoConfig {
    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
