use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;

mod domain;
mod application;
mod infrastructure;

use application::errors::{BotError, ConfigError};
use application::messaging::MessageDispatcher;
use application::services::CommandService;
use domain::traits::Bot;
use infrastructure::adapters::{ConsoleAdapter, DiscordAdapter};
use infrastructure::adapters::discord;
use infrastructure::config::{Config, TOKEN_ENV};
use infrastructure::liveness::{LivenessHandle, LivenessServer};

#[derive(Parser)]
#[command(name = "pong-bot")]
#[command(about = "A minimal Discord bot with a liveness endpoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config and DISCORD_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run {
        /// Read commands from stdin instead of connecting to Discord
        #[arg(long)]
        console: bool,
    },
    /// Show version
    Version,
    /// Print the default config
    InitConfig,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { console } => run_bot(&cli.config, cli.token, console),
        Commands::Version => {
            println!("pong-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

/// The message an operator sees for a fatal error
fn fatal_message(err: &BotError) -> String {
    match err {
        BotError::Config(ConfigError::MissingField(field)) if field == TOKEN_ENV => {
            format!("Discord token is not configured. Make sure the {} environment variable is set.", TOKEN_ENV)
        }
        BotError::Config(e) => format!("Invalid configuration: {}", e),
        BotError::Auth(_) => {
            format!("Login failed: the Discord token is invalid. Check the {} environment variable.", TOKEN_ENV)
        }
        e => format!("An unexpected error occurred: {}", e),
    }
}

fn report(err: &BotError) {
    tracing::error!("{}", fatal_message(err));
}

fn load_config(config_path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let config = if Path::new(config_path).exists() {
        Config::load(config_path)?.with_env()?
    } else {
        Config::load_env()?
    };

    Ok(match token_override {
        Some(token) => Config {
            discord: infrastructure::config::DiscordConfig { token: Some(token), ..config.discord },
            ..config
        },
        None => config,
    })
}

fn build_dispatcher(config: &Config) -> Arc<MessageDispatcher> {
    let mut commands = CommandService::new(&config.bot.prefix);
    commands.register_defaults();
    tracing::info!("Registered {} command(s) with prefix {:?}", commands.len(), commands.prefix());
    Arc::new(MessageDispatcher::new(commands))
}

fn run_bot(config_path: &str, token_override: Option<String>, console: bool) -> Result<(), BotError> {
    let config = load_config(config_path, token_override)?;
    tracing::info!("Starting {}", config.bot.name);

    let dispatcher = build_dispatcher(&config);

    let bot: Box<dyn Bot> = if console {
        Box::new(ConsoleAdapter::new(dispatcher))
    } else {
        // Resolve everything before touching the network
        let token = config.token()?;
        let liveness = LivenessServer::from_config(&config.liveness)?;
        Box::new(
            DiscordAdapter::new(
                token,
                discord::intents(config.discord.members_intent),
                dispatcher,
                Arc::new(LivenessHandle::new(liveness)),
            )
            .with_name(config.bot.name.clone()),
        )
    };

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;

    rt.block_on(async {
        bot.start().await?;
        let info = bot.bot_info();
        tracing::info!("{} ({}) disconnected", info.name, info.id);
        Ok(())
    })
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
