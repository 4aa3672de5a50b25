use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use homework_bot::{
    client::{ClientConfig, HomeworkPollerBuilder, PollingConfig, PracticumApi},
    config::{BotConfig, default_config_path, load_config},
    domain::Cursor,
    logging::{LoggingConfig, init_logging},
    notifier::{Notifier, TelegramChannel, TelegramConfig},
    startup::check_startup,
};
use tracing::info;

#[derive(Debug, Parser)]
#[command(version, about = "Reports Practicum homework status changes to Telegram")]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log raw API responses and lower the log level to debug
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(default_config_path);
    let config = load_config(&config_path)?.apply_env(|key| std::env::var(key).ok())?;

    let logging_config = logging_config(&config, args.debug);
    let log_dir = logging_config.log_dir.clone();
    let _log_guard = init_logging(logging_config)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_path.display(),
        "Homework bot starting up"
    );

    let channel = Arc::new(TelegramChannel::new(&TelegramConfig::from(&config))?);
    check_startup(&config, channel.clone()).await?;

    let mut client_config =
        ClientConfig::from(&config).with_debug_logging(config.log_responses || args.debug);
    if let Some(dir) = log_dir {
        client_config.debug.log_directory = Some(dir.join("responses"));
    }

    let api = Arc::new(PracticumApi::new(client_config)?);
    let notifier = Notifier::new(channel, config.telegram_chat_id.clone());

    let poller = HomeworkPollerBuilder::new()
        .api(api)
        .notifier(notifier)
        .polling(&PollingConfig::from(&config))
        .cursor(Cursor::now())
        .build()
        .map_err(|e| eyre!(e))?;

    match poller.run().await {}
}

fn logging_config(config: &BotConfig, debug: bool) -> LoggingConfig {
    let logging = LoggingConfig::from_env();
    match (&config.log_level, debug) {
        (_, true) => logging.with_level("debug"),
        (Some(level), false) => logging.with_level(level),
        (None, false) => logging,
    }
}
