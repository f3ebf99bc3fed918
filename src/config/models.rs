use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    pub files: FilesConfig,
    /// Maximum number of accounts processed at the same time
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Lower pacing bound and fixed retry spacing, in milliseconds
    #[serde(default = "default_min_delay", alias = "minDelay")]
    pub min_delay: u64,
    /// Upper pacing bound, in milliseconds
    #[serde(default = "default_max_delay", alias = "maxDelay")]
    pub max_delay: u64,
    /// Maximum attempts per API operation (first call included)
    #[serde(default = "default_retry_attempts", alias = "retryAttempts")]
    pub retry_attempts: u32,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// Config file this was loaded from
    #[serde(skip)]
    pub source: Option<PathBuf>,
    /// Directory the config file was loaded from; input paths resolve against it
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl Config {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay)
    }

    /// Resolve an input path relative to the config file directory
    pub fn resolve_path(&self, path: &std::path::Path) -> PathBuf {
        match &self.base_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

fn default_concurrency() -> usize {
    5
}

fn default_min_delay() -> u64 {
    1000
}

fn default_max_delay() -> u64 {
    3000
}

fn default_retry_attempts() -> u32 {
    3
}

/// Remote game API endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(alias = "baseURL")]
    pub base_url: String,
    #[serde(alias = "authEndpoint")]
    pub auth_endpoint: String,
    #[serde(alias = "questListEndpoint")]
    pub quest_list_endpoint: String,
    #[serde(alias = "completeTaskEndpoint")]
    pub complete_task_endpoint: String,
    #[serde(alias = "claimTaskEndpoint")]
    pub claim_task_endpoint: String,
    /// Per-request timeout; the transport default applies when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl ApiConfig {
    pub fn auth_url(&self) -> String {
        format!("{}{}", self.base_url, self.auth_endpoint)
    }

    pub fn quest_list_url(&self) -> String {
        format!("{}{}", self.base_url, self.quest_list_endpoint)
    }

    pub fn complete_task_url(&self) -> String {
        format!("{}{}", self.base_url, self.complete_task_endpoint)
    }

    pub fn claim_task_url(&self) -> String {
        format!("{}{}", self.base_url, self.claim_task_endpoint)
    }
}

/// Line-delimited input files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FilesConfig {
    /// One account identifier per line
    #[serde(alias = "hashFile")]
    pub hash_file: PathBuf,
    /// One User-Agent string per line
    #[serde(alias = "userAgentFile")]
    pub user_agent_file: PathBuf,
}

/// What happens when a batch is still running at the next tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlapPolicy {
    /// Run batches inline and drop ticks missed while one is running
    #[default]
    Skip,
    /// Spawn every tick's batch regardless of batches still in flight
    Allow,
}

/// Batch scheduling
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            overlap: OverlapPolicy::default(),
        }
    }
}

fn default_interval_secs() -> u64 {
    24 * 60 * 60
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
