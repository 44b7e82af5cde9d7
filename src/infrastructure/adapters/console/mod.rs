//! Console adapter for development/testing

use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use crate::domain::entities::User;
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;

const CONSOLE_CHAT: &str = "console";

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    user: User,
    dispatcher: Arc<MessageDispatcher>,
}

impl ConsoleAdapter {
    pub fn new(dispatcher: Arc<MessageDispatcher>) -> Self {
        Self {
            info: BotInfo {
                id: "console-bot".to_string(),
                name: "pong-bot".to_string(),
                username: "console".to_string(),
            },
            user: User::new("console-user").with_username("you"),
            dispatcher,
        }
    }

    /// Reply to one line typed by the console user
    pub fn respond(&self, line: &str) -> Result<Option<String>, BotError> {
        self.dispatcher.process_text(CONSOLE_CHAT, line.trim(), Some(self.user.clone()), Some(self.info.id.as_str()))
    }

    /// Answer every line from `input` until it ends
    pub async fn run<R>(&self, input: R) -> Result<usize, BotError>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        let mut replies = 0;

        while let Some(line) = lines.next_line().await
            .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
        {
            match self.respond(&line) {
                Ok(Some(reply)) => {
                    self.send_message(CONSOLE_CHAT, &reply).await?;
                    replies += 1;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("[{}] Error: {}", CONSOLE_CHAT, e),
            }
        }

        Ok(replies)
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting console bot (dev mode), type !ping");
        let replies = self.run(BufReader::new(tokio::io::stdin())).await?;
        tracing::info!("Console closed after {} replies", replies);
        Ok(())
    }

    async fn send_message(&self, _chat_id: &str, text: &str) -> Result<String, BotError> {
        println!("[BOT] {}", text);
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::CommandService;

    fn console() -> ConsoleAdapter {
        let mut commands = CommandService::new("!");
        commands.register_defaults();
        ConsoleAdapter::new(Arc::new(MessageDispatcher::new(commands)))
    }

    #[test]
    fn ping_from_console() {
        assert_eq!(console().respond("!ping\n").unwrap().as_deref(), Some("Pong !"));
        assert_eq!(console().respond("hello").unwrap(), None);
    }

    #[tokio::test]
    async fn run_counts_replies() {
        let input: &[u8] = b"!ping\nhello\n!nope\n!ping\n";
        let replies = console().run(input).await.unwrap();
        assert_eq!(replies, 2);
    }
}
