//! Telegram Bot API adapter.

mod client;
mod types;

pub use client::{TelegramClient, TelegramClientConfig};
pub use types::{ApiResponse, BotCommand, Message, Update};
