//! Game API client
//!
//! [`QuestApi`] is the seam between the account worker and the remote
//! service. [`HttpQuestClient`] talks to the real API over reqwest; tests
//! substitute in-memory fakes.
//!
//! Wire format:
//!
//! - `POST {base}{auth}` body `{"data": account}` →
//!   `{"success": bool, "data": [token, {"userData": {..}, "gameData": {..}}]}`
//! - `GET {base}{quest_list}` with bearer auth → `{"data": [quest, ...]}`
//! - `POST {base}{complete}` / `POST {base}{claim}` body `{"questId": id}`, with `id` echoed as
//!   received (string or number)

mod error;
mod http;
mod models;

#[cfg(test)]
pub(crate) mod fake;

pub use error::ApiError;
pub use http::HttpQuestClient;
pub use models::{Quest, QuestId, QuestProgress, QuestStatus, RequestHeaders, Session};

use async_trait::async_trait;

use crate::inputs::AccountId;

/// The four remote operations an account worker needs
///
/// Implementations perform exactly one attempt per call; retrying is the
/// caller's job. Complete and claim carry no idempotency key.
#[async_trait]
pub trait QuestApi: Send + Sync {
    /// Exchange an account identifier for a bearer session
    async fn authenticate(
        &self,
        account: &AccountId,
        headers: &RequestHeaders,
    ) -> Result<Session, ApiError>;

    /// Current quest list, in API order
    async fn quest_list(
        &self,
        token: &str,
        headers: &RequestHeaders,
    ) -> Result<Vec<Quest>, ApiError>;

    async fn complete_task(
        &self,
        token: &str,
        quest_id: &QuestId,
        headers: &RequestHeaders,
    ) -> Result<(), ApiError>;

    async fn claim_task(
        &self,
        token: &str,
        quest_id: &QuestId,
        headers: &RequestHeaders,
    ) -> Result<(), ApiError>;
}
