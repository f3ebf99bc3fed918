//! Per-account worker
//!
//! Each account goes through a linear pass: authenticate, fetch quests,
//! complete/claim what is eligible with a random pause after every quest,
//! then re-authenticate to report the updated balance. Every remote call
//! goes through the shared [`RetryPolicy`].

mod action;
pub mod runner;

pub use action::{Pacing, QuestAction};
pub use runner::{AccountOutcome, AccountReport, AccountWorker, Step, WorkerError};

use crate::config::Config;
use crate::retry::RetryPolicy;

/// Worker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSettings {
    pub retry: RetryPolicy,
    pub pacing: Pacing,
}

impl WorkerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            retry: RetryPolicy::from_config(config),
            pacing: Pacing::new(config.min_delay(), config.max_delay()),
        }
    }
}
