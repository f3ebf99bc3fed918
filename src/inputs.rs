//! Line-delimited input files: account identifiers and user agents

use crate::config::Config;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file {} has no entries", path.display())]
    Empty { path: PathBuf },
}

/// Opaque account credential, sent verbatim as the auth payload
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountId(Arc<str>);

impl AccountId {
    pub fn new(raw: impl Into<Arc<str>>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty set of User-Agent strings
#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Returns `None` for an empty list
    pub fn new(agents: Vec<String>) -> Option<Self> {
        if agents.is_empty() {
            None
        } else {
            Some(Self { agents })
        }
    }

    /// Uniformly random pick
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        // Non-empty by construction
        self.agents
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.agents.len()
    }
}

/// Everything read from disk at startup
#[derive(Debug, Clone)]
pub struct Inputs {
    pub accounts: Vec<AccountId>,
    pub user_agents: UserAgentPool,
}

impl Inputs {
    /// Load both input files named by the configuration
    pub fn load(config: &Config) -> Result<Self, InputError> {
        let hash_path = config.resolve_path(&config.files.hash_file);
        let ua_path = config.resolve_path(&config.files.user_agent_file);

        let accounts: Vec<AccountId> = load_lines(&hash_path)?
            .into_iter()
            .map(AccountId::new)
            .collect();
        if accounts.is_empty() {
            warn!(path = %hash_path.display(), "Account file is empty, batches will do nothing");
        }

        let user_agents = UserAgentPool::new(load_lines(&ua_path)?)
            .ok_or(InputError::Empty { path: ua_path })?;

        info!(
            accounts = accounts.len(),
            user_agents = user_agents.len(),
            "Input files loaded"
        );

        Ok(Self {
            accounts,
            user_agents,
        })
    }
}

/// Read a file into trimmed, non-empty lines in file order
pub fn load_lines(path: &Path) -> Result<Vec<String>, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_lines(&content))
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
