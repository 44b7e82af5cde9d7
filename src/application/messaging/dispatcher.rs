//! Message dispatcher - Routes messages to command handlers

use crate::domain::entities::{Message, User};
use crate::application::errors::{BotError, CommandError};
use crate::application::services::CommandService;
use super::parser::MessageParser;

/// Handler result
pub type HandlerResult = Result<Option<String>, BotError>;

/// Message dispatcher - filters out bot-authored messages and runs commands
pub struct MessageDispatcher {
    parser: MessageParser,
    commands: CommandService,
}

impl MessageDispatcher {
    pub fn new(commands: CommandService) -> Self {
        Self {
            parser: MessageParser::new(commands.prefix()),
            commands,
        }
    }

    pub fn parser(&self) -> &MessageParser {
        &self.parser
    }

    /// Parse a raw text message and dispatch it
    pub fn process_text(
        &self,
        chat_id: impl Into<String>,
        text: impl Into<String>,
        sender: Option<User>,
        own_id: Option<&str>,
    ) -> HandlerResult {
        let message = self.parser.parse(chat_id, text, sender);
        self.dispatch(&message, own_id)
    }

    /// Dispatch a parsed message, returning the reply to send if any.
    ///
    /// Messages written by the bot itself, or by any other bot account,
    /// never reach the command handlers.
    pub fn dispatch(&self, message: &Message, own_id: Option<&str>) -> HandlerResult {
        if own_id.is_some_and(|id| message.is_from(id)) {
            tracing::trace!("[{}] Ignoring own message", message.chat_id);
            return Ok(None);
        }
        if message.sender.as_ref().is_some_and(|u| u.is_bot) {
            tracing::trace!("[{}] Ignoring message from another bot", message.chat_id);
            return Ok(None);
        }

        match self.commands.handle(message) {
            Ok(Some(reply)) => {
                tracing::debug!("[{}:{}] Command handled at {}", message.platform, message.chat_id, message.timestamp);
                Ok(Some(reply))
            }
            Ok(None) => Ok(None),
            Err(CommandError::NotFound(name)) => {
                tracing::debug!("[{}] Unknown command: {}{}", message.chat_id, self.parser.prefix(), name);
                Ok(None)
            }
            Err(e) => Err(BotError::Command(e)),
        }
    }
}
