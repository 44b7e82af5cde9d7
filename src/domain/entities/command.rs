use std::collections::HashMap;

use crate::application::errors::CommandError;
use crate::domain::entities::Message;

/// Command handler function type
pub type CommandHandler = Box<dyn Fn(&Message) -> Result<String, CommandError> + Send + Sync>;

/// Represents a bot command
pub struct Command {
    pub name: String,
    pub description: Option<String>,
    pub handler: Option<CommandHandler>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            handler: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Message) -> Result<String, CommandError> + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Exact, case-sensitive match on the command name
    pub fn matches(&self, input: &str) -> bool {
        self.name == input
    }
}

/// Command registry for managing available commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Command>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Command) {
        self.commands.insert(command.name.clone(), command);
    }

    pub fn find(&self, input: &str) -> Option<&Command> {
        self.commands.values().find(|c| c.matches(input))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let cmd = Command::new("ping");
        assert!(cmd.matches("ping"));
        assert!(!cmd.matches("PING"));
        assert!(!cmd.matches("pin"));
        assert!(!cmd.matches("pingpong"));
    }

    #[test]
    fn registering_same_name_replaces_command() {
        let mut registry = CommandRegistry::new();
        assert_eq!(registry.len(), 0);

        registry.register(Command::new("ping").with_description("first"));
        registry.register(Command::new("ping").with_description("second"));

        assert_eq!(registry.len(), 1);
        let cmd = registry.find("ping").unwrap();
        assert_eq!(cmd.description.as_deref(), Some("second"));
        assert!(registry.find("pong").is_none());
    }
}
