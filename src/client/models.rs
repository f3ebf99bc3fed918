use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated session for one account
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub balance: f64,
}

/// Quest identifier, echoed back to the API exactly as received
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct QuestId(serde_json::Value);

impl From<&str> for QuestId {
    fn from(value: &str) -> Self {
        Self(serde_json::Value::String(value.to_string()))
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            serde_json::Value::String(id) => f.write_str(id),
            other => write!(f, "{other}"),
        }
    }
}

/// Remote quest record
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Quest {
    #[serde(rename = "_id")]
    pub id: QuestId,
    #[serde(default)]
    pub title: String,
    /// Passed through untouched
    #[serde(default)]
    pub rewards: serde_json::Value,
    pub progress: QuestProgress,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestProgress {
    #[serde(default)]
    pub claimed: bool,
    #[serde(default)]
    pub status: QuestStatus,
}

/// Quest progress status as reported by the API
///
/// Anything other than `"start"` or `"claimable"`, including a missing or
/// non-string status, is kept as [`QuestStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "serde_json::Value", into = "String")]
pub enum QuestStatus {
    Start,
    Claimable,
    Other(String),
}

impl Default for QuestStatus {
    fn default() -> Self {
        QuestStatus::Other(String::new())
    }
}

impl From<serde_json::Value> for QuestStatus {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(status) => QuestStatus::from(status),
            serde_json::Value::Null => QuestStatus::default(),
            other => QuestStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for QuestStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "start" => QuestStatus::Start,
            "claimable" => QuestStatus::Claimable,
            _ => QuestStatus::Other(value),
        }
    }
}

impl From<QuestStatus> for String {
    fn from(value: QuestStatus) -> Self {
        match value {
            QuestStatus::Start => "start".to_string(),
            QuestStatus::Claimable => "claimable".to_string(),
            QuestStatus::Other(other) => other,
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestStatus::Start => f.write_str("start"),
            QuestStatus::Claimable => f.write_str("claimable"),
            QuestStatus::Other(other) => f.write_str(other),
        }
    }
}

/// Per-account request headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    pub user_agent: String,
}

impl RequestHeaders {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

// Wire envelopes

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub data: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestRequest<'a> {
    #[serde(rename = "questId")]
    pub quest_id: &'a QuestId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `data` of a successful auth response: `[token, user]`
pub(crate) type AuthPayload = (String, UserRecord);

#[derive(Debug, Deserialize)]
pub(crate) struct UserRecord {
    #[serde(rename = "userData")]
    pub user_data: UserData,
    #[serde(rename = "gameData")]
    pub game_data: GameData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserData {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameData {
    pub balance: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestListResponse {
    pub data: Vec<Quest>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quest_deserialization() {
        let quest: Quest = serde_json::from_value(json!({
            "_id": "q-1",
            "title": "Join channel",
            "rewards": [{"type": "coin", "amount": 100}],
            "progress": {"claimed": false, "status": "start"}
        }))
        .unwrap();

        assert_eq!(quest.id, QuestId::from("q-1"));
        assert_eq!(quest.title, "Join channel");
        assert_eq!(quest.progress.status, QuestStatus::Start);
        assert!(!quest.progress.claimed);
        assert_eq!(quest.rewards[0]["amount"], 100);
    }

    #[test]
    fn test_unknown_status_kept_verbatim() {
        let progress: QuestProgress =
            serde_json::from_value(json!({"claimed": true, "status": "done"})).unwrap();

        assert_eq!(progress.status, QuestStatus::Other("done".to_string()));
        assert_eq!(progress.status.to_string(), "done");
    }

    #[test]
    fn test_auth_payload_shape() {
        let response: AuthResponse = serde_json::from_value(json!({
            "success": true,
            "data": ["tok-123", {"userData": {"username": "alice"}, "gameData": {"balance": 1500}}]
        }))
        .unwrap();

        let (token, user): AuthPayload = serde_json::from_value(response.data).unwrap();
        assert_eq!(token, "tok-123");
        assert_eq!(user.user_data.username, "alice");
        assert_eq!(user.game_data.balance, 1500.0);
    }

    #[test]
    fn test_quest_request_wire_name() {
        let id = QuestId::from("q-9");
        let body = serde_json::to_value(QuestRequest { quest_id: &id }).unwrap();
        assert_eq!(body, json!({"questId": "q-9"}));
    }

    #[test]
    fn test_numeric_quest_id_echoed_unchanged() {
        let response: QuestListResponse = serde_json::from_value(json!({
            "data": [{"_id": 42, "progress": {"claimed": false, "status": "start"}}]
        }))
        .unwrap();

        let id = &response.data[0].id;
        assert_eq!(id.to_string(), "42");

        let body = serde_json::to_value(QuestRequest { quest_id: id }).unwrap();
        assert_eq!(body, json!({"questId": 42}));
    }

    #[test]
    fn test_missing_or_odd_status_does_not_reject_list() {
        let response: QuestListResponse = serde_json::from_value(json!({
            "data": [
                {"_id": "a", "progress": {"claimed": true}},
                {"_id": "b", "progress": {"claimed": false, "status": 7}},
                {"_id": "c", "progress": {"claimed": false, "status": null}},
                {"_id": "d", "progress": {"claimed": false, "status": "start"}}
            ]
        }))
        .unwrap();

        let statuses: Vec<QuestStatus> = response
            .data
            .into_iter()
            .map(|quest| quest.progress.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                QuestStatus::Other(String::new()),
                QuestStatus::Other("7".to_string()),
                QuestStatus::Other(String::new()),
                QuestStatus::Start,
            ]
        );
    }

    #[test]
    fn test_quest_list_without_data_is_error() {
        let result = serde_json::from_str::<QuestListResponse>(r#"{"success": true}"#);
        assert!(result.is_err());
    }
}
