//! Task Courier binary: configuration, wiring and the polling loop.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use task_courier::adapters::storage::InMemoryDialogueStore;
use task_courier::adapters::task_api::{HttpTaskApi, HttpTaskApiConfig};
use task_courier::adapters::telegram::{BotCommand, TelegramClient, TelegramClientConfig};
use task_courier::application::{Command, Router};
use task_courier::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let telegram = Arc::new(TelegramClient::new(
        TelegramClientConfig::new(config.telegram.token())
            .with_api_url(config.telegram.api_url.clone())
            .with_poll_timeout(Duration::from_secs(config.telegram.poll_timeout_secs)),
    ));
    let api = Arc::new(HttpTaskApi::new(
        HttpTaskApiConfig::new(config.task_api.base_url())
            .with_upload_timeout(Duration::from_secs(config.task_api.upload_timeout_secs)),
    ));
    let store = Arc::new(InMemoryDialogueStore::new());

    let router = Router::new(
        store,
        api,
        Arc::clone(&telegram) as Arc<dyn task_courier::ports::ChatTransport>,
        config.telegram.welcome_image.clone(),
    );

    let commands: Vec<BotCommand> = Command::ALL
        .iter()
        .map(|c| BotCommand {
            command: c.name(),
            description: c.description(),
        })
        .collect();
    telegram.set_my_commands(&commands).await?;

    tracing::info!("bot started");

    let mut offset = 0i64;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
            updates = telegram.get_updates(offset) => match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(message) = update.message else { continue };
                        let chat = message.conversation();
                        if let Err(err) = router.handle(chat, message.to_incoming()).await {
                            tracing::error!(%chat, error = %err, "failed to handle update");
                        }
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "polling failed");
                    tokio::time::sleep(Duration::from_secs(3)).await;
                }
            },
        }
    }

    Ok(())
}
