//! In-memory `QuestApi` for unit tests

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{
    ApiError, Quest, QuestApi, QuestId, QuestProgress, QuestStatus, RequestHeaders, Session,
};
use crate::inputs::AccountId;

pub(crate) const CLAIM_REWARD: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Authenticate { account: String, user_agent: String },
    QuestList { account: String },
    Complete { account: String, quest_id: String },
    Claim { account: String, quest_id: String },
}

impl Call {
    pub(crate) fn account(&self) -> &str {
        match self {
            Call::Authenticate { account, .. }
            | Call::QuestList { account }
            | Call::Complete { account, .. }
            | Call::Claim { account, .. } => account,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeAccount {
    pub username: String,
    pub balance: f64,
    pub quests: Vec<Quest>,
    /// Authentication failures before the first success
    pub auth_failures: usize,
    /// Completion failures before the first success
    pub complete_failures: usize,
}

impl FakeAccount {
    pub(crate) fn new(username: &str, balance: f64) -> Self {
        Self {
            username: username.to_string(),
            balance,
            ..Default::default()
        }
    }

    pub(crate) fn with_quest(mut self, id: &str, claimed: bool, status: &str) -> Self {
        self.quests.push(quest(id, claimed, status));
        self
    }

    pub(crate) fn failing_auth(mut self, failures: usize) -> Self {
        self.auth_failures = failures;
        self
    }

    pub(crate) fn failing_complete(mut self, failures: usize) -> Self {
        self.complete_failures = failures;
        self
    }
}

pub(crate) fn quest(id: &str, claimed: bool, status: &str) -> Quest {
    Quest {
        id: QuestId::from(id),
        title: format!("Quest {id}"),
        rewards: serde_json::Value::Null,
        progress: QuestProgress {
            claimed,
            status: QuestStatus::from(status.to_string()),
        },
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    accounts: Mutex<HashMap<String, FakeAccount>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_account(self, id: &str, account: FakeAccount) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(id.to_string(), account);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn calls_for(&self, account: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| call.account() == account)
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn account_for_token(token: &str) -> String {
        token.strip_prefix("token:").unwrap_or(token).to_string()
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "try again".to_string(),
        }
    }
}

#[async_trait]
impl QuestApi for FakeApi {
    async fn authenticate(
        &self,
        account: &AccountId,
        headers: &RequestHeaders,
    ) -> Result<Session, ApiError> {
        self.record(Call::Authenticate {
            account: account.to_string(),
            user_agent: headers.user_agent.clone(),
        });

        let mut accounts = self.accounts.lock().unwrap();
        let Some(state) = accounts.get_mut(account.as_str()) else {
            return Err(ApiError::Authentication("unknown account".to_string()));
        };

        if state.auth_failures > 0 {
            state.auth_failures -= 1;
            return Err(ApiError::Authentication("invalid init data".to_string()));
        }

        Ok(Session {
            token: format!("token:{account}"),
            username: state.username.clone(),
            balance: state.balance,
        })
    }

    async fn quest_list(
        &self,
        token: &str,
        _headers: &RequestHeaders,
    ) -> Result<Vec<Quest>, ApiError> {
        let account = Self::account_for_token(token);
        self.record(Call::QuestList {
            account: account.clone(),
        });

        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get(&account)
            .map(|state| state.quests.clone())
            .unwrap_or_default())
    }

    async fn complete_task(
        &self,
        token: &str,
        quest_id: &QuestId,
        _headers: &RequestHeaders,
    ) -> Result<(), ApiError> {
        let account = Self::account_for_token(token);
        self.record(Call::Complete {
            account: account.clone(),
            quest_id: quest_id.to_string(),
        });

        let mut accounts = self.accounts.lock().unwrap();
        if let Some(state) = accounts.get_mut(&account) {
            if state.complete_failures > 0 {
                state.complete_failures -= 1;
                return Err(Self::unavailable());
            }
        }
        Ok(())
    }

    async fn claim_task(
        &self,
        token: &str,
        quest_id: &QuestId,
        _headers: &RequestHeaders,
    ) -> Result<(), ApiError> {
        let account = Self::account_for_token(token);
        self.record(Call::Claim {
            account: account.clone(),
            quest_id: quest_id.to_string(),
        });

        let mut accounts = self.accounts.lock().unwrap();
        if let Some(state) = accounts.get_mut(&account) {
            state.balance += CLAIM_REWARD;
        }
        Ok(())
    }
}
