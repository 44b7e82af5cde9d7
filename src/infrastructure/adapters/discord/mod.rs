//! Discord adapter

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serenity::all::{ChannelId, Client, Context, EventHandler, GatewayIntents, Ready};
use serenity::gateway::GatewayError;
use serenity::http::Http;
use serenity::model::channel::Message as DiscordMessage;
use std::sync::Arc;

use crate::domain::entities::{Message, User};
use crate::domain::traits::{Bot, BotInfo};
use crate::application::errors::BotError;
use crate::application::messaging::{MessageDispatcher, MessageParser};
use crate::infrastructure::liveness::LivenessHandle;

/// Platform tag stamped on messages coming from Discord
const PLATFORM: &str = "discord";

/// Gateway intents the bot connects with.
///
/// Message content is privileged but required to read command text.
pub fn intents(members: bool) -> GatewayIntents {
    let mut intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;
    if members {
        intents |= GatewayIntents::GUILD_MEMBERS;
    }
    intents
}

/// Map a serenity error to a bot error, singling out a rejected token
pub fn classify_client_error(err: serenity::Error) -> BotError {
    let invalid_token = match &err {
        serenity::Error::Gateway(GatewayError::InvalidAuthentication) => true,
        serenity::Error::Http(e) => e.status_code().map(|s| s.as_u16()) == Some(401),
        _ => false,
    };

    if invalid_token {
        BotError::Auth(err.to_string())
    } else {
        BotError::Network(err.to_string())
    }
}

fn parse_channel_id(chat_id: &str) -> Result<ChannelId, BotError> {
    chat_id.parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(ChannelId::new)
        .ok_or_else(|| BotError::Internal(format!("Invalid channel id: {}", chat_id)))
}

/// Post text to a channel; every outgoing message goes through here
async fn send_text(http: &Http, chat_id: &str, text: &str) -> Result<String, BotError> {
    tracing::debug!("Sending to {}: {}", chat_id, text);
    let channel = parse_channel_id(chat_id)?;
    let sent = channel.say(http, text)
        .await
        .map_err(classify_client_error)?;
    Ok(sent.id.to_string())
}

fn to_domain(parser: &MessageParser, msg: &DiscordMessage) -> Message {
    let mut sender = User::new(msg.author.id.to_string()).with_username(msg.author.name.clone());
    if msg.author.bot {
        sender = sender.as_bot();
    }

    parser.parse(msg.channel_id.to_string(), msg.content.clone(), Some(sender))
        .with_id(msg.id.to_string())
        .with_platform(PLATFORM)
}

/// Gateway event handler
struct Handler {
    dispatcher: Arc<MessageDispatcher>,
    liveness: Arc<LivenessHandle>,
    info: Arc<OnceCell<BotInfo>>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        let user = &ready.user;
        let info = BotInfo {
            id: user.id.to_string(),
            name: user.global_name.clone().unwrap_or_else(|| user.name.clone()),
            username: user.name.clone(),
        };

        tracing::info!("Connected as {} ({})", info.username, info.id);
        tracing::info!("Bot is online!");
        let _ = self.info.set(info);

        if self.liveness.ensure_started() {
            tracing::info!("Started liveness server on {}", self.liveness.addr());
        }
    }

    async fn message(&self, ctx: Context, msg: DiscordMessage) {
        let own_id = self.info.get().map(|i| i.id.as_str());
        let message = to_domain(self.dispatcher.parser(), &msg);

        match self.dispatcher.dispatch(&message, own_id) {
            Ok(Some(reply)) => {
                if let Err(e) = send_text(&ctx.http, &message.chat_id, &reply).await {
                    tracing::error!("Failed to send message: {}", e);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("[{}] Error: {}", message.chat_id, e),
        }
    }
}

/// Discord bot adapter
pub struct DiscordAdapter {
    token: String,
    intents: GatewayIntents,
    http: Arc<Http>,
    dispatcher: Arc<MessageDispatcher>,
    liveness: Arc<LivenessHandle>,
    info: Arc<OnceCell<BotInfo>>,
    name: String,
}

impl DiscordAdapter {
    pub fn new(
        token: impl Into<String>,
        intents: GatewayIntents,
        dispatcher: Arc<MessageDispatcher>,
        liveness: Arc<LivenessHandle>,
    ) -> Self {
        let token = token.into();
        Self {
            http: Arc::new(Http::new(&token)),
            token,
            intents,
            dispatcher,
            liveness,
            info: Arc::new(OnceCell::new()),
            name: "pong-bot".to_string(),
        }
    }

    /// Name reported by `bot_info` until Discord has sent ours
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Bot for DiscordAdapter {
    async fn start(&self) -> Result<(), BotError> {
        tracing::info!("Starting Discord bot (intents: {:?})", self.intents);

        let handler = Handler {
            dispatcher: self.dispatcher.clone(),
            liveness: self.liveness.clone(),
            info: self.info.clone(),
        };

        let mut client = Client::builder(&self.token, self.intents)
            .event_handler(handler)
            .await
            .map_err(classify_client_error)?;

        client.start().await.map_err(classify_client_error)
    }

    async fn send_message(&self, chat_id: &str, text: &str) -> Result<String, BotError> {
        send_text(&self.http, chat_id, text).await
    }

    fn bot_info(&self) -> BotInfo {
        self.info.get()
            .cloned()
            .unwrap_or_else(|| BotInfo::unknown(self.name.clone()))
    }
}
