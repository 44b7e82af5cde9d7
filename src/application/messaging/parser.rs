//! Message parser - Parses raw messages into structured messages

use crate::domain::entities::{Message, Content, User};

/// Parses incoming messages into structured Message objects
pub struct MessageParser {
    command_prefix: String,
}

impl MessageParser {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            command_prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.command_prefix
    }

    /// Parse a text message
    pub fn parse(&self, chat_id: impl Into<String>, text: impl Into<String>, sender: Option<User>) -> Message {
        let text = text.into();
        let chat_id = chat_id.into();

        let content = if text.is_empty() {
            Content::Empty
        } else if let Some(rest) = self.strip_prefix(&text) {
            Self::parse_command(rest)
        } else {
            Content::Text(text)
        };

        Message::new(chat_id, content).with_sender_opt(sender)
    }

    fn strip_prefix<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.command_prefix.is_empty() {
            return None;
        }
        text.strip_prefix(self.command_prefix.as_str())
    }

    /// Split the text after the prefix into a command name and arguments.
    ///
    /// The name is whatever directly follows the prefix, so `"! ping"`
    /// yields an empty name that no command matches.
    fn parse_command(rest: &str) -> Content {
        let (name, tail) = match rest.find(char::is_whitespace) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };

        Content::Command {
            name: name.to_string(),
            args: tail.split_whitespace().map(str::to_string).collect(),
        }
    }
}

impl Message {
    /// Helper to set sender as Option
    pub fn with_sender_opt(mut self, user: Option<User>) -> Self {
        if let Some(u) = user {
            self.sender = Some(u);
        }
        self
    }
}
