//! Craftops Bot - Entry Point

use std::sync::Arc;

use anyhow::Context;

use craftops_bot::{AppConfig, BotGateway, ControlClient, TelegramAdapter, TelegramConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to info level if RUST_LOG not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!(api_url = %config.control_api_url, "starting craftops-bot");

    let client = Arc::new(
        ControlClient::new(
            config.control_api_url.clone(),
            config.control_api_key.clone(),
        )
        .context("failed to build control API client")?,
    );
    let adapter = Arc::new(
        TelegramAdapter::new(TelegramConfig::new(
            config.telegram_bot_token.clone(),
            config.allowed_chat_ids.clone(),
        ))
        .context("failed to build Telegram adapter")?,
    );

    let gateway = BotGateway::new(adapter, client);
    gateway.start().await.context("failed to start gateway")?;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;
    tracing::info!("shutting down");
    gateway.stop().await?;

    Ok(())
}
