use async_trait::async_trait;
use crate::application::errors::BotError;

/// Bot trait - abstraction for messaging platform adapters
#[async_trait]
pub trait Bot: Send + Sync {
    /// Connect and process messages until the connection ends
    async fn start(&self) -> Result<(), BotError>;

    /// Send a message to a chat, returning the platform message id
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Bot information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}

impl BotInfo {
    /// Placeholder identity used before the platform has reported ours
    pub fn unknown(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: "unknown".to_string(),
            username: name.clone(),
            name,
        }
    }
}
