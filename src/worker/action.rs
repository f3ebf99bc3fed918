use rand::Rng;
use std::time::Duration;

use crate::client::{QuestProgress, QuestStatus};

/// What to do with a single quest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestAction {
    /// Not started: complete, then claim
    CompleteAndClaim,
    /// Finished but unclaimed: claim only
    Claim,
    /// Nothing to do
    Skip,
}

impl QuestAction {
    pub fn for_progress(progress: &QuestProgress) -> Self {
        match (progress.claimed, &progress.status) {
            (false, QuestStatus::Start) => QuestAction::CompleteAndClaim,
            (false, QuestStatus::Claimable) => QuestAction::Claim,
            _ => QuestAction::Skip,
        }
    }
}

/// Random pause window between quests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    min: Duration,
    max: Duration,
}

impl Pacing {
    /// Bounds are reordered if given backwards
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Uniform sample in `[min, max]`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        rng.gen_range(self.min..=self.max)
    }
}
