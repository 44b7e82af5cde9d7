use crate::domain::entities::{Command, CommandRegistry, Message, Content};
use crate::application::errors::CommandError;

/// Reply sent for the ping command
pub const PING_REPLY: &str = "Pong !";

/// Service for managing and executing commands
pub struct CommandService {
    registry: CommandRegistry,
    prefix: String,
}

impl CommandService {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            registry: CommandRegistry::new(),
            prefix: prefix.into(),
        }
    }

    pub fn register(&mut self, command: Command) {
        tracing::debug!(
            "Registering command {}{} - {}",
            self.prefix,
            command.name,
            command.description.as_deref().unwrap_or("no description"),
        );
        self.registry.register(command);
    }

    pub fn register_defaults(&mut self) {
        self.register(Command::new("ping")
            .with_description("Check the bot is alive")
            .with_handler(|_| Ok(PING_REPLY.to_string())));
    }

    /// Execute the command carried by a message.
    ///
    /// Returns `Ok(None)` for anything that is not a command, and
    /// `CommandError::NotFound` when no registered command has that name.
    pub fn handle(&self, message: &Message) -> Result<Option<String>, CommandError> {
        let Content::Command { name, args } = &message.content else {
            return Ok(None);
        };

        let cmd = self.registry.find(name)
            .ok_or_else(|| CommandError::NotFound(name.clone()))?;

        if !args.is_empty() {
            tracing::debug!("Ignoring extra arguments to {}: {:?}", cmd.name, args);
        }

        if let Some(handler) = &cmd.handler {
            Ok(Some(handler(message)?))
        } else {
            Err(CommandError::ExecutionFailed(format!("Command {} has no handler", cmd.name)))
        }
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> CommandService {
        let mut commands = CommandService::new("!");
        commands.register_defaults();
        commands
    }

    #[test]
    fn defaults_register_only_ping() {
        let commands = service();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands.prefix(), "!");
    }

    #[test]
    fn ping_replies_pong() {
        let msg = Message::from_command("chan", "ping", vec![]);
        assert_eq!(service().handle(&msg).unwrap(), Some("Pong !".to_string()));
    }

    #[test]
    fn ping_ignores_extra_args() {
        let msg = Message::from_command("chan", "ping", vec!["now".to_string()]);
        assert_eq!(service().handle(&msg).unwrap(), Some(PING_REPLY.to_string()));
    }

    #[test]
    fn unknown_command_is_not_found() {
        let msg = Message::from_command("chan", "pong", vec![]);
        let err = service().handle(&msg).unwrap_err();
        assert!(matches!(err, CommandError::NotFound(name) if name == "pong"));
    }

    #[test]
    fn plain_text_is_not_handled() {
        let msg = Message::from_text("chan", "ping");
        assert_eq!(service().handle(&msg).unwrap(), None);
    }

    #[test]
    fn command_without_handler_fails() {
        let mut commands = CommandService::new("!");
        commands.register(Command::new("stub"));
        let msg = Message::from_command("chan", "stub", vec![]);
        assert!(matches!(commands.handle(&msg), Err(CommandError::ExecutionFailed(_))));
    }

    #[test]
    fn handler_errors_propagate() {
        let mut commands = CommandService::new("!");
        commands.register(Command::new("fail")
            .with_handler(|_| Err(CommandError::ExecutionFailed("boom".to_string()))));
        let msg = Message::from_command("chan", "fail", vec![]);
        let err = commands.handle(&msg).unwrap_err();
        assert_eq!(err.to_string(), "Execution failed: boom");
    }
}
