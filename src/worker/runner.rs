//! Account runner - drives one account through a single quest pass

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, error, info, info_span};

use super::WorkerSettings;
use super::action::QuestAction;
use crate::client::{ApiError, QuestApi, RequestHeaders};
use crate::inputs::{AccountId, UserAgentPool};

/// Stage of the account pass that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Authenticate,
    FetchQuests,
    CompleteQuest,
    ClaimQuest,
    RefreshBalance,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Authenticate => "authenticate",
            Step::FetchQuests => "fetch quest list",
            Step::CompleteQuest => "complete quest",
            Step::ClaimQuest => "claim quest",
            Step::RefreshBalance => "refresh balance",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct WorkerError {
    pub step: Step,
    #[source]
    pub source: ApiError,
}

impl WorkerError {
    fn at(step: Step) -> impl FnOnce(ApiError) -> Self {
        move |source| Self { step, source }
    }
}

pub type Result<T> = std::result::Result<T, WorkerError>;

/// Summary of a finished account pass
#[derive(Debug, Clone, PartialEq)]
pub struct AccountReport {
    pub username: String,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub completed: usize,
    pub claimed: usize,
    pub skipped: usize,
}

/// Result of one account in a batch
#[derive(Debug)]
pub struct AccountOutcome {
    pub account: AccountId,
    pub result: Result<AccountReport>,
}

impl AccountOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs the authenticate → quests → re-authenticate pass for an account
pub struct AccountWorker<A> {
    api: Arc<A>,
    user_agents: UserAgentPool,
    settings: WorkerSettings,
}

impl<A: QuestApi> AccountWorker<A> {
    pub fn new(api: Arc<A>, user_agents: UserAgentPool, settings: WorkerSettings) -> Self {
        Self {
            api,
            user_agents,
            settings,
        }
    }

    /// Process an account, logging instead of propagating any failure
    pub async fn run(&self, account: AccountId) -> AccountOutcome {
        let span = info_span!("account", username = tracing::field::Empty);
        let result = self.process(&account).instrument(span).await;

        if let Err(e) = &result {
            error!(
                account = %account,
                step = %e.step,
                error = %e.source,
                "Error while processing account {}: {}",
                account,
                e
            );
        }

        AccountOutcome { account, result }
    }

    /// One full pass; the first error after retries aborts the account
    pub async fn process(&self, account: &AccountId) -> Result<AccountReport> {
        let user_agent = self.user_agents.pick(&mut rand::thread_rng()).to_string();
        let headers = RequestHeaders::new(user_agent);
        let headers = &headers;
        let api = &*self.api;
        let retry = &self.settings.retry;

        let session = retry
            .run("authenticate", move || api.authenticate(account, headers))
            .await
            .map_err(WorkerError::at(Step::Authenticate))?;
        tracing::Span::current().record("username", session.username.as_str());

        let token = session.token.as_str();
        let quests = retry
            .run("quest_list", move || api.quest_list(token, headers))
            .await
            .map_err(WorkerError::at(Step::FetchQuests))?;

        let mut report = AccountReport {
            username: session.username.clone(),
            initial_balance: session.balance,
            final_balance: session.balance,
            completed: 0,
            claimed: 0,
            skipped: 0,
        };

        for quest in &quests {
            let quest_id = &quest.id;

            match QuestAction::for_progress(&quest.progress) {
                QuestAction::CompleteAndClaim => {
                    info!(quest_id = %quest_id, "Completing quest: {}", quest.title);
                    retry
                        .run("complete_task", move || {
                            api.complete_task(token, quest_id, headers)
                        })
                        .await
                        .map_err(WorkerError::at(Step::CompleteQuest))?;
                    report.completed += 1;

                    retry
                        .run("claim_task", move || api.claim_task(token, quest_id, headers))
                        .await
                        .map_err(WorkerError::at(Step::ClaimQuest))?;
                    report.claimed += 1;
                }
                QuestAction::Claim => {
                    info!(quest_id = %quest_id, "Claiming quest reward: {}", quest.title);
                    retry
                        .run("claim_task", move || api.claim_task(token, quest_id, headers))
                        .await
                        .map_err(WorkerError::at(Step::ClaimQuest))?;
                    report.claimed += 1;
                }
                QuestAction::Skip => {
                    info!(
                        quest_id = %quest_id,
                        status = %quest.progress.status,
                        "Quest already completed: {}",
                        quest.title
                    );
                    report.skipped += 1;
                }
            }

            let pause = self.settings.pacing.sample(&mut rand::thread_rng());
            tokio::time::sleep(pause).await;
        }

        let refreshed = retry
            .run("authenticate", move || api.authenticate(account, headers))
            .await
            .map_err(WorkerError::at(Step::RefreshBalance))?;
        report.final_balance = refreshed.balance;

        info!(
            balance = refreshed.balance,
            completed = report.completed,
            claimed = report.claimed,
            skipped = report.skipped,
            "User {} updated balance: {}",
            report.username,
            refreshed.balance
        );

        Ok(report)
    }
}
