//! reqwest-backed client for the game API

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONNECTION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, info};

use super::error::ApiError;
use super::models::{
    AuthPayload, AuthRequest, AuthResponse, Quest, QuestId, QuestListResponse, QuestRequest,
    RequestHeaders, Session,
};
use super::QuestApi;
use crate::config::ApiConfig;
use crate::inputs::AccountId;

/// Fully built endpoint URLs
#[derive(Debug, Clone)]
struct Endpoints {
    auth: String,
    quest_list: String,
    complete_task: String,
    claim_task: String,
}

/// HTTP client for the four game API operations
#[derive(Debug, Clone)]
pub struct HttpQuestClient {
    client: Client,
    endpoints: Endpoints,
}

impl HttpQuestClient {
    /// Create a new client; no timeout unless `request_timeout_secs` is set
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))?;

        Ok(Self {
            client,
            endpoints: Endpoints {
                auth: config.auth_url(),
                quest_list: config.quest_list_url(),
                complete_task: config.complete_task_url(),
                claim_task: config.claim_task_url(),
            },
        })
    }

    fn request(
        &self,
        method: Method,
        url: &str,
        headers: &RequestHeaders,
        token: Option<&str>,
    ) -> Result<RequestBuilder, ApiError> {
        let mut request = self
            .client
            .request(method, url)
            .header(USER_AGENT, HeaderValue::from_str(&headers.user_agent)?);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        Ok(request)
    }

    /// Send and reject non-2xx responses, keeping the body for diagnostics
    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }

    async fn post_quest(
        &self,
        url: &str,
        token: &str,
        quest_id: &QuestId,
        headers: &RequestHeaders,
    ) -> Result<(), ApiError> {
        let request = self
            .request(Method::POST, url, headers, Some(token))?
            .json(&QuestRequest { quest_id });

        Self::send(request).await?;
        Ok(())
    }

    async fn authenticate_once(
        &self,
        account: &AccountId,
        headers: &RequestHeaders,
    ) -> Result<Session, ApiError> {
        let request = self
            .request(Method::POST, &self.endpoints.auth, headers, None)?
            .json(&AuthRequest {
                data: account.as_str(),
            });

        let text = Self::send(request).await?.text().await?;
        let response: AuthResponse = serde_json::from_str(&text)?;

        if !response.success {
            return Err(ApiError::Authentication(format!("rejected by server: {text}")));
        }

        let (token, user): AuthPayload = serde_json::from_value(response.data)?;

        Ok(Session {
            token,
            username: user.user_data.username,
            balance: user.game_data.balance,
        })
    }
}

#[async_trait]
impl QuestApi for HttpQuestClient {
    async fn authenticate(
        &self,
        account: &AccountId,
        headers: &RequestHeaders,
    ) -> Result<Session, ApiError> {
        let session = self
            .authenticate_once(account, headers)
            .await
            .map_err(ApiError::into_authentication)?;

        info!(
            username = %session.username,
            balance = session.balance,
            "User {} logged in, balance: {}",
            session.username,
            session.balance
        );

        Ok(session)
    }

    async fn quest_list(
        &self,
        token: &str,
        headers: &RequestHeaders,
    ) -> Result<Vec<Quest>, ApiError> {
        let request =
            self.request(Method::GET, &self.endpoints.quest_list, headers, Some(token))?;

        let text = Self::send(request).await?.text().await?;
        let response: QuestListResponse = serde_json::from_str(&text)?;

        debug!(quests = response.data.len(), "Quest list fetched");
        Ok(response.data)
    }

    async fn complete_task(
        &self,
        token: &str,
        quest_id: &QuestId,
        headers: &RequestHeaders,
    ) -> Result<(), ApiError> {
        self.post_quest(&self.endpoints.complete_task, token, quest_id, headers)
            .await?;
        info!(quest_id = %quest_id, "Quest {} completed", quest_id);
        Ok(())
    }

    async fn claim_task(
        &self,
        token: &str,
        quest_id: &QuestId,
        headers: &RequestHeaders,
    ) -> Result<(), ApiError> {
        self.post_quest(&self.endpoints.claim_task, token, quest_id, headers)
            .await?;
        info!(quest_id = %quest_id, "Quest {} reward claimed", quest_id);
        Ok(())
    }
}
