//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::application::errors::ConfigError;

/// Environment variable holding the Discord bot token
pub const TOKEN_ENV: &str = "DISCORD_TOKEN";
/// Environment variable holding the liveness port (set by the hosting platform)
pub const PORT_ENV: &str = "PORT";
/// Environment variable overriding the command prefix
pub const PREFIX_ENV: &str = "BOT_PREFIX";

pub const DEFAULT_PORT: u16 = 5000;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub discord: DiscordConfig,
    pub liveness: LivenessConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiscordConfig {
    pub token: Option<String>,
    /// Request the privileged GUILD_MEMBERS intent
    pub members_intent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LivenessConfig {
    pub host: String,
    pub port: u16,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "pong-bot".to_string(),
            prefix: "!".to_string(),
        }
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: None,
            members_intent: true,
        }
    }
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    pub fn load_env() -> Result<Self, ConfigError> {
        Config::default().with_env()
    }

    /// Overlay the process environment on top of this config
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup` (keyed by environment variable name)
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(TOKEN_ENV) {
            self.discord.token = Some(token);
        }

        if let Some(port) = lookup(PORT_ENV) {
            self.liveness.port = port.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(format!("{} must be a port number, got {:?}", PORT_ENV, port))
            })?;
        }

        if let Some(prefix) = lookup(PREFIX_ENV) {
            if prefix.is_empty() {
                return Err(ConfigError::InvalidValue(format!("{} must not be empty", PREFIX_ENV)));
            }
            self.bot.prefix = prefix;
        }

        Ok(self)
    }

    /// The Discord token, or `MissingField` when it is absent or blank
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.discord.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ConfigError::MissingField(TOKEN_ENV.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.bot.prefix, "!");
        assert_eq!(config.liveness.port, 5000);
        assert_eq!(config.liveness.host, "0.0.0.0");
        assert!(config.discord.members_intent);
    }

    #[test]
    fn missing_token_is_reported() {
        let config = Config::default().with_overrides(env(&[])).unwrap();
        let err = config.token().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(ref f) if f == "DISCORD_TOKEN"));
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let config = Config::default().with_overrides(env(&[(TOKEN_ENV, "   ")])).unwrap();
        assert!(config.token().is_err());
    }

    #[test]
    fn environment_overrides() {
        let config = Config::default()
            .with_overrides(env(&[(TOKEN_ENV, "abc.def"), (PORT_ENV, "8080"), (PREFIX_ENV, "?")]))
            .unwrap();
        assert_eq!(config.token().unwrap(), "abc.def");
        assert_eq!(config.liveness.port, 8080);
        assert_eq!(config.bot.prefix, "?");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = Config::default().with_overrides(env(&[(PORT_ENV, "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn empty_prefix_is_rejected() {
        let err = Config::default().with_overrides(env(&[(PREFIX_ENV, "")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("liveness:\n  port: 10000\n").unwrap();
        assert_eq!(config.liveness.port, 10000);
        assert_eq!(config.liveness.host, "0.0.0.0");
        assert_eq!(config.bot.prefix, "!");
    }

    #[test]
    fn yaml_uses_kebab_case() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("members-intent"));

        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.liveness, LivenessConfig::default());
    }

    #[test]
    fn env_overrides_file() {
        let file = Config::from_yaml("discord:\n  token: from-file\nliveness:\n  port: 7000\n").unwrap();
        let config = file.with_overrides(env(&[(PORT_ENV, "9000")])).unwrap();
        assert_eq!(config.token().unwrap(), "from-file");
        assert_eq!(config.liveness.port, 9000);
    }

    #[test]
    fn bad_yaml_is_a_parse_error() {
        assert!(matches!(Config::from_yaml("bot: [1, 2"), Err(ConfigError::Parse(_))));
    }
}
