use serde::{Deserialize, Serialize};

/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

/// Telegram message id (numeric, scoped to a chat).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// Who a message came from. Built from the first observed message;
/// the core never deletes users (expiry is a store policy).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

impl UserProfile {
    /// Public profile link: `t.me` when a handle exists, `tg://` deep link otherwise.
    pub fn profile_link(&self) -> String {
        match &self.username {
            Some(handle) => format!("https://t.me/{handle}"),
            None => format!("tg://user?id={}", self.user_id.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_link_prefers_handle() {
        let with_handle = UserProfile {
            user_id: UserId(42),
            first_name: "Ann".to_string(),
            username: Some("ann_b".to_string()),
        };
        assert_eq!(with_handle.profile_link(), "https://t.me/ann_b");

        let without = UserProfile {
            user_id: UserId(42),
            first_name: "Ann".to_string(),
            username: None,
        };
        assert_eq!(without.profile_link(), "tg://user?id=42");
    }
}
